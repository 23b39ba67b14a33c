pub mod errors;
pub mod notifications;

pub use errors::{ServiceError, ServiceResult};
