//! # Coursely Common Library
//!
//! Shared code for the Coursely backend:
//! - Database initialization, schema and models
//! - Credential hashing and session-token helpers
//! - Configuration loading and root folder resolution
//! - Common error type

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
