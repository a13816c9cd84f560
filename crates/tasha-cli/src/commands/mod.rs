pub mod edit;
pub mod eligible;
pub mod list;
pub mod new;
pub mod roll;
pub mod show;
pub mod srd;

use tasha_mechanics::CharacterState;
use tasha_srd::Srd;

fn load_srd() -> Result<Srd, String> {
    Srd::load().map_err(|e| format!("rules corpus failed to load: {e}"))
}

/// "Fighter 3 (Champion) / Barbarian 2"
fn class_summary(state: &CharacterState) -> String {
    if state.classes.is_empty() {
        return "—".to_string();
    }
    state
        .classes
        .iter()
        .map(|(name, class)| match &class.subclass {
            Some(subclass) => format!("{name} {} ({subclass})", class.level),
            None => format!("{name} {}", class.level),
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

fn signed(n: i32) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasha_mechanics::ClassLevel;

    #[test]
    fn class_summary_lists_classes_in_order() {
        let mut state = CharacterState::new();
        assert_eq!(class_summary(&state), "—");
        state.classes.insert(
            "Fighter".into(),
            ClassLevel {
                level: 3,
                subclass: Some("Champion".into()),
                hit_die: 10,
            },
        );
        state.classes.insert(
            "Barbarian".into(),
            ClassLevel {
                level: 2,
                subclass: None,
                hit_die: 12,
            },
        );
        assert_eq!(class_summary(&state), "Fighter 3 (Champion) / Barbarian 2");
    }

    #[test]
    fn signed_modifiers() {
        assert_eq!(signed(2), "+2");
        assert_eq!(signed(0), "+0");
        assert_eq!(signed(-1), "-1");
    }
}
