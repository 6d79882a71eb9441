use thiserror::Error;

use crate::FactoryError;

/// Errors returned when resolving a name from a locator.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// No factory was ever registered under `name`.
    #[error("no factory registered under `{name}`")]
    NotFound { name: String },

    /// The instance exists but is not of the requested type.
    #[error("instance `{name}` is a `{found}`, not a `{expected}`")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The factory for `name` returned an error. The name stays uncached.
    #[error("factory for `{name}` failed")]
    Factory {
        name: String,
        #[source]
        source: FactoryError,
    },
}

impl LocatorError {
    /// The name the failed lookup was made for.
    pub fn name(&self) -> &str {
        match self {
            LocatorError::NotFound { name }
            | LocatorError::TypeMismatch { name, .. }
            | LocatorError::Factory { name, .. } => name,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LocatorError::NotFound { .. })
    }
}
