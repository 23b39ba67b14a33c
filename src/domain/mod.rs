pub mod channel;
pub mod grid;
pub mod notification;
pub mod types;
