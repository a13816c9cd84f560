//! Character progression engine for the tasha character builder.
//!
//! Provides dice rolling, the ability score generator, the character record
//! with its typed merge operation, derived quantities (hit points,
//! proficiency bonus, spell slots), feat and multiclass eligibility, and a
//! [`Session`] that walks a player through character creation against the
//! rules corpus in [`tasha_srd`].

pub mod ability;
pub mod config;
pub mod derive;
pub mod dice;
pub mod eligibility;
pub mod error;
pub mod progression;
pub mod prompt;
pub mod sheet;

pub use ability::{AbilityScore, generate_scores, modifier};
pub use config::SessionConfig;
pub use dice::{DiceExpr, Rolls};
pub use eligibility::{eligible_feats, eligible_multiclasses, meets_feat_requirements};
pub use error::{MechError, MechResult};
pub use progression::Session;
pub use prompt::{Prompt, PromptError, RandomPrompt};
pub use sheet::{CharacterState, ClassLevel, Field, FieldKind, MapKind, MapValue, Patch, Value};
