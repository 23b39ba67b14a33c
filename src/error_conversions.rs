//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::forms::notifications::{MassDeleteFormError, MassUpdateFormError};
    use crate::services::ServiceError;

    impl From<MassDeleteFormError> for ServiceError {
        fn from(val: MassDeleteFormError) -> Self {
            match val {
                MassDeleteFormError::Validation(_) => ServiceError::Form(val.to_string()),
                MassDeleteFormError::TypeConstraint(_) => {
                    ServiceError::TypeConstraint(val.to_string())
                }
            }
        }
    }

    impl From<MassUpdateFormError> for ServiceError {
        fn from(val: MassUpdateFormError) -> Self {
            match val {
                MassUpdateFormError::Validation(_) => ServiceError::Form(val.to_string()),
                MassUpdateFormError::TypeConstraint(_) => {
                    ServiceError::TypeConstraint(val.to_string())
                }
            }
        }
    }
}
