//! Core library exports for the Zapiski blog application.
//!
//! This crate exposes the domain model, persistence layer, forms, routes and
//! service layers used by the Zapiski web application. The `data` feature
//! compiles only the reusable persistence/domain layer; the default `server`
//! feature builds the full Actix-web application on top of it.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
