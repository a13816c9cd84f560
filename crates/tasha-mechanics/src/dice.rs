//! `NdM` dice expressions: the 4d6 ability roll and starting gold such
//! as `5d4`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::MechError;

/// `count` dice with `sides` faces each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    /// Number of dice, at least one.
    pub count: u32,
    /// Faces per die, at least two.
    pub sides: u32,
}

impl DiceExpr {
    /// Build an expression. Callers pass literal dice, so degenerate
    /// values are raised to the smallest valid roll.
    pub fn new(count: u32, sides: u32) -> Self {
        Self {
            count: count.max(1),
            sides: sides.max(2),
        }
    }

    /// Roll every die.
    pub fn roll(self, rng: &mut StdRng) -> Rolls {
        Rolls(
            (0..self.count)
                .map(|_| rng.random_range(1..=self.sides))
                .collect(),
        )
    }
}

impl FromStr for DiceExpr {
    type Err = MechError;

    /// Parse `NdM`; a missing `N` means one die.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MechError::InvalidDice(s.to_string());
        let lower = s.trim().to_lowercase();
        let (count, sides) = lower.split_once('d').ok_or_else(invalid)?;
        let count = match count {
            "" => 1,
            n => n.parse::<u32>().map_err(|_| invalid())?,
        };
        let sides = sides.parse::<u32>().map_err(|_| invalid())?;
        if count == 0 || sides < 2 {
            return Err(invalid());
        }
        Ok(Self { count, sides })
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Face values from one roll, in roll order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rolls(pub Vec<u32>);

impl Rolls {
    /// Sum of every die.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Sum of the `n` highest dice.
    pub fn keep_highest(&self, n: usize) -> u32 {
        let mut values = self.0.clone();
        values.sort_unstable_by(|a, b| b.cmp(a));
        values.into_iter().take(n).sum()
    }
}

impl fmt::Display for Rolls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn parse_expressions() {
        assert_eq!("5d4".parse::<DiceExpr>().unwrap(), DiceExpr::new(5, 4));
        assert_eq!(" 4D6 ".parse::<DiceExpr>().unwrap(), DiceExpr::new(4, 6));
        assert_eq!("d20".parse::<DiceExpr>().unwrap(), DiceExpr::new(1, 20));
        assert_eq!(DiceExpr::new(2, 8).to_string(), "2d8");
    }

    #[test]
    fn parse_rejects_garbage() {
        for expr in ["", "5", "0d6", "2d1", "xd6", "2d", "2d6+1"] {
            assert!(
                matches!(expr.parse::<DiceExpr>(), Err(MechError::InvalidDice(_))),
                "{expr}"
            );
        }
    }

    #[test]
    fn degenerate_literals_are_raised() {
        assert_eq!(DiceExpr::new(0, 0), DiceExpr::new(1, 2));
    }

    #[test]
    fn rolls_stay_on_the_die() {
        let mut rng = StdRng::seed_from_u64(42);
        let rolls = DiceExpr::new(10, 6).roll(&mut rng);
        assert_eq!(rolls.0.len(), 10);
        assert!(rolls.0.iter().all(|v| (1..=6).contains(v)));
    }

    #[test]
    fn same_seed_same_rolls() {
        let expr = DiceExpr::new(3, 20);
        let a = expr.roll(&mut StdRng::seed_from_u64(99));
        let b = expr.roll(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn keep_highest_drops_lowest() {
        let rolls = Rolls(vec![2, 6, 1, 5]);
        assert_eq!(rolls.total(), 14);
        assert_eq!(rolls.keep_highest(3), 13);
        assert_eq!(rolls.keep_highest(10), 14);
        assert_eq!(rolls.keep_highest(0), 0);
        assert_eq!(Rolls::default().keep_highest(3), 0);
    }

    #[test]
    fn display() {
        assert_eq!(Rolls(vec![3, 5]).to_string(), "[3, 5] = 8");
    }
}
