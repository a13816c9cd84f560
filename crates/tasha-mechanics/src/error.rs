//! Error types for the progression engine.

use tasha_srd::SrdError;

use crate::prompt::PromptError;

/// Errors that can occur while building a character.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A rules corpus lookup failed.
    #[error(transparent)]
    Srd(#[from] SrdError),

    /// The attribute generator was asked for a total it can never reach.
    #[error("threshold {threshold} is infeasible: six 4d6-drop-lowest rolls total at most {max}")]
    InfeasibleThreshold {
        /// The requested minimum total.
        threshold: u32,
        /// The largest total the generator can produce.
        max: u32,
    },

    /// The merge operation received a value it cannot apply to the field.
    #[error("malformed update to '{field}': {reason}")]
    MalformedUpdate {
        /// Name of the target field.
        field: String,
        /// What was wrong with the update.
        reason: String,
    },

    /// The prompt returned a selection that was not offered.
    #[error("ineligible choice for {message}: {reason}")]
    IneligibleChoice {
        /// The prompt message the answer was given for.
        message: String,
        /// What was wrong with the answer.
        reason: String,
    },

    /// A derived value needs at least one class.
    #[error("character has no classes")]
    NoClasses,

    /// A dice expression could not be parsed.
    #[error("invalid dice expression: {0}")]
    InvalidDice(String),

    /// The prompt collaborator failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl MechError {
    /// Shorthand for a [`MechError::MalformedUpdate`].
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedUpdate {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`MechError::IneligibleChoice`].
    pub fn ineligible(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IneligibleChoice {
            message: message.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for engine operations.
pub type MechResult<T> = Result<T, MechError>;
