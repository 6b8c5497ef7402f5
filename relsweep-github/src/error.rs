//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// GraphQL request failed or returned a structured error payload
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// Project not found
    #[error("Project {0} not found")]
    ProjectNotFound(u64),

    /// Pull request not found
    #[error("Pull request #{0} not found")]
    PrNotFound(u64),

    /// Release not found or empty
    #[error("Release not found or has no content: {0}")]
    ReleaseNotFound(String),

    /// No project item wraps the given issue
    #[error("No project item found for issue {0}")]
    ProjectItemNotFound(String),

    /// Status option absent from the field's options
    #[error("Status \"{status}\" not found in options of field \"{field}\"")]
    StatusOptionNotFound {
        /// Requested status name
        status: String,
        /// Field the lookup ran against
        field: String,
    },

    /// Malformed release URL
    #[error("Invalid release URL format: {0}")]
    InvalidReleaseUrl(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}
