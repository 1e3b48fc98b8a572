//! Domain error taxonomy.

use thiserror::Error;
use validator::Validate;

use crate::store::StoreError;

/// Classified domain failures.
///
/// Each classified variant carries a fixed transport status code and a
/// formatted message. Anything else surfaces as [`DomainError::Store`] and
/// maps to 500 with the failure's own description.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field was missing or empty.
    #[error("{0} field is invalid.")]
    InvalidField(String),

    /// A lookup by id, key or name yielded nothing.
    #[error("{0} not found!")]
    NotFound(&'static str),

    /// A uniqueness check on the business key failed.
    #[error("{0} with this {1} already exists!")]
    AlreadyExists(&'static str, &'static str),

    /// Unclassified failure from the entity store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Transport status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::InvalidField(_) => 400,
            DomainError::NotFound(_) => 404,
            DomainError::AlreadyExists(_, _) => 409,
            DomainError::Store(_) => 500,
        }
    }
}

/// Runs `validator` checks on a request shape and folds the first failing
/// field into [`DomainError::InvalidField`].
pub fn check_fields<T: Validate>(request: &T) -> Result<(), DomainError> {
    request.validate().map_err(|errors| {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|field| field.to_string())
            .unwrap_or_else(|| "request".to_string());
        DomainError::InvalidField(field)
    })
}
