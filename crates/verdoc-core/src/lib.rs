//! Core library for verdoc.
//!
//! This crate provides the foundational types and functionality used by the
//! `verdoc` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`builder`] - Build invocation (install + docs build with timeout)
//! - [`config`] - Configuration loading and management
//! - [`copier`] - Copying component docs into a versioned destination
//! - [`error`] - Error types and result aliases
//! - [`locate`] - Locating documentation sources in the working copy
//! - [`nav`] - Navigation index maintenance
//! - [`pipeline`] - The per-version generation run loop
//! - [`precheck`] - Environment checks before a run
//! - [`repo`] - Source-repository operations
//!
//! # Quick Start
//!
//! ```no_run
//! use verdoc_core::{Config, ConfigLoader};
//!
//! let config = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load()
//!     .expect("Failed to load configuration");
//!
//! println!("Log level: {:?}", config.log_level);
//! ```
#![deny(unsafe_code)]

pub mod builder;

pub mod config;

pub mod copier;

pub mod error;

pub mod locate;

pub mod nav;

pub mod pipeline;

pub mod precheck;

pub mod repo;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
