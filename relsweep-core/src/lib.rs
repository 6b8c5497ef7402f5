//! Relsweep core - configuration and release-notes handling
//!
//! This crate provides everything relsweep needs apart from the GitHub API
//! itself: layered configuration, token loading, git repository detection,
//! and the release-notes pull-request extractor.

pub mod config;
pub mod error;
pub mod notes;
pub mod repo;
pub mod secrets;

pub use config::{Config, Overrides, ProjectConfig, RepositoryConfig};
pub use error::{Error, Result};
pub use notes::{extract_pull_requests, NotesSource, PullRequestRef};
pub use secrets::Secrets;
