//! Core library exports for the push notification admin service.
//!
//! The `data` feature exposes the persistence layer (schema, models, domain
//! types and repositories). The `server` feature adds the data grid engine,
//! forms, services and Actix routes used by the web application.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod datagrid;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod i18n;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
