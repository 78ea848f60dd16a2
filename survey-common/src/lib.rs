//! # Survey Common Library
//!
//! Shared code for the survey intake service:
//! - Configuration loading (TOML file, environment, defaults)
//! - The persisted `SurveyRecord` model
//! - The `Datastore` seam and its MySQL/SQLite implementations

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::SurveyRecord;
