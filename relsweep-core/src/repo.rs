//! Git repository detection
//!
//! Used to resolve the target repository from the enclosing checkout when no
//! `--repo` flag or GITHUB_REPOSITORY variable is set.

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::{Error, Result};

/// Find the default remote URL of the repository enclosing `path`
///
/// Searches upward from `path` for a git repository, then returns the URL of
/// "origin", falling back to the first remote that has a URL.
pub fn detect_remote_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let repo = Repository::discover(path).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound {
            Error::Config(format!(
                "Not a git repository: {}. Pass --repo owner/repo or set GITHUB_REPOSITORY",
                path.display()
            ))
        } else {
            Error::Other(format!("Git error: {}", e))
        }
    })?;

    if let Ok(remote) = repo.find_remote("origin") {
        if let Some(url) = remote.url() {
            debug!(url = %url, "Using origin remote");
            return Ok(url.to_string());
        }
    }

    let remotes = repo
        .remotes()
        .map_err(|e| Error::Other(format!("Failed to list remotes: {}", e)))?;

    for remote_name in remotes.iter().flatten() {
        if let Ok(remote) = repo.find_remote(remote_name) {
            if let Some(url) = remote.url() {
                debug!(remote = %remote_name, url = %url, "Using first available remote");
                return Ok(url.to_string());
            }
        }
    }

    Err(Error::Config(
        "Repository has no remotes with a URL. Pass --repo owner/repo".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let result = detect_remote_url(dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Not a git repository"));
    }

    #[test]
    fn test_detect_repository_without_remotes() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        let result = detect_remote_url(dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("no remotes"));
    }

    #[test]
    fn test_detect_origin_remote() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "https://github.com/acme/widgets.git")
            .unwrap();

        let url = detect_remote_url(dir.path()).unwrap();
        assert_eq!(url, "https://github.com/acme/widgets.git");
    }
}
