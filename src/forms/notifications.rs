use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{NotificationId, TypeConstraintError};

/// Parse a comma separated list of notification ids, skipping blanks and
/// duplicates.
fn parse_indexes(raw: &str) -> Result<Vec<NotificationId>, IndexesError> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let value: i32 = part
            .parse()
            .map_err(|_| IndexesError::NotANumber(part.to_string()))?;
        let id = NotificationId::new(value)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return Err(IndexesError::Empty);
    }
    Ok(ids)
}

/// Reasons a selection of notification ids is rejected.
#[derive(Debug, Error)]
pub enum IndexesError {
    #[error("no notifications selected")]
    Empty,
    #[error("`{0}` is not a notification id")]
    NotANumber(String),
    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),
}

#[derive(Deserialize, Validate)]
pub struct MassDeleteForm {
    #[validate(length(min = 1))]
    pub indexes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassDeleteFormPayload {
    pub ids: Vec<NotificationId>,
}

#[derive(Debug, Error)]
pub enum MassDeleteFormError {
    #[error("Mass delete form validation failed: {0}")]
    Validation(String),
    #[error("Mass delete form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for MassDeleteFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<IndexesError> for MassDeleteFormError {
    fn from(value: IndexesError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<MassDeleteForm> for MassDeleteFormPayload {
    type Error = MassDeleteFormError;

    fn try_from(value: MassDeleteForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            ids: parse_indexes(&value.indexes)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct MassUpdateForm {
    #[validate(length(min = 1))]
    pub indexes: String,
    /// `1` enables, `0` disables.
    #[validate(range(min = 0, max = 1))]
    pub update_value: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassUpdateFormPayload {
    pub ids: Vec<NotificationId>,
    pub status: bool,
}

#[derive(Debug, Error)]
pub enum MassUpdateFormError {
    #[error("Mass update form validation failed: {0}")]
    Validation(String),
    #[error("Mass update form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for MassUpdateFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<IndexesError> for MassUpdateFormError {
    fn from(value: IndexesError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<MassUpdateForm> for MassUpdateFormPayload {
    type Error = MassUpdateFormError;

    fn try_from(value: MassUpdateForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            ids: parse_indexes(&value.indexes)?,
            status: value.update_value == 1,
        })
    }
}
