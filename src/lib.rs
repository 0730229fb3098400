//! CMS Guard - authentication and RBAC core for the CMS admin backend.
//!
//! Implements the identity and access-control subsystem the admin panel's
//! resource routes sit behind: password login issues a stateless session
//! token, and every protected request resolves its token to a user whose
//! hierarchical role carries a resource/action permission set. Persistence
//! is abstracted behind [`store::DirectoryStore`]; HTTP wiring and entity
//! CRUD belong to the host application.

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
