pub mod channel;
#[cfg(feature = "server")]
pub mod config;
pub mod notification;
