use std::fmt;

use thiserror::Error;

use super::PopsicleId;
use crate::service::PatchError;

#[derive(Debug, Error, PartialEq)]
pub enum PopsicleError {
    #[error("Popsicle with ID {0} not found.")]
    NotFound(PopsicleId),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("malformed patch: {0}")]
    MalformedPatch(#[from] PatchError),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<ValidationErrors> for PopsicleError {
    fn from(value: ValidationErrors) -> Self {
        PopsicleError::Validation(value)
    }
}

impl From<anyhow::Error> for PopsicleError {
    fn from(value: anyhow::Error) -> Self {
        PopsicleError::Storage(format!("{value:#}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a payload broke, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
