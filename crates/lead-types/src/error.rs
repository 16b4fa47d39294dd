use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("field name for {role} must not be empty")]
    EmptyFieldName { role: &'static str },

    #[error("field name {0:?} is assigned to more than one role")]
    DuplicateFieldName(String),

    #[error("expected a JSON object for a lead record, got {0}")]
    NotAnObject(&'static str),
}

/// Convenience alias for type results.
pub type TypeResult<T> = Result<T, TypeError>;
