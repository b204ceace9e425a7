//! Error types for ComboForge

use thiserror::Error;

/// Main error type for ComboForge operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboError {
    /// No feasible assignment exists within the search bounds, or no bandit
    /// arm is consistent with the requested context.
    #[error("Unsatisfiable: {0}")]
    Unsatisfiable(String),

    /// No variable or child scope matches the reference.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An unqualified name matches more than one variable.
    #[error("Ambiguous name '{name}', candidates: {}", .candidates.join(", "))]
    AmbiguousName {
        /// The reference that was looked up.
        name: String,
        /// Qualified paths of every match.
        candidates: Vec<String>,
    },

    /// A value was requested as a shape it does not have.
    #[error("Type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A value lies outside its variable's domain.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// A bandit update referenced an assignment that is not one of its arms.
    #[error("Assignment is not an arm of this bandit")]
    UnknownArm,

    /// Error in model definition
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

impl ComboError {
    pub(crate) fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ComboError::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for ComboForge operations
pub type Result<T> = std::result::Result<T, ComboError>;
