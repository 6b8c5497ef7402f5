//! Release lookup by tag

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

/// Parse a release URL into (owner, repo, tag)
///
/// The URL must have the exact shape
/// `https://github.com/<owner>/<repo>/releases/tag/<tag>`; anything else
/// fails before any network call is made.
pub fn parse_release_url(release_url: &str) -> Result<(String, String, String)> {
    let invalid = || Error::InvalidReleaseUrl(release_url.to_string());

    let url = url::Url::parse(release_url).map_err(|_| invalid())?;

    if url.scheme() != "https" || url.host_str() != Some("github.com") {
        return Err(invalid());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        &[owner, repo, "releases", "tag", tag] => {
            Ok((owner.to_string(), repo.to_string(), tag.to_string()))
        }
        _ => Err(invalid()),
    }
}

const RELEASE_QUERY: &str = r#"
    query($owner: String!, $repo: String!, $tag: String!) {
        repository(owner: $owner, name: $repo) {
            release(tagName: $tag) {
                description
            }
        }
    }
"#;

#[derive(Debug, Deserialize)]
struct ReleaseQuery {
    repository: Option<ReleaseRepository>,
}

#[derive(Debug, Deserialize)]
struct ReleaseRepository {
    release: Option<ReleaseNode>,
}

#[derive(Debug, Deserialize)]
struct ReleaseNode {
    description: Option<String>,
}

impl GitHubClient {
    /// Fetch the plain-text description of the release behind a release URL
    ///
    /// The release may live in a different repository than the one this
    /// client was constructed for; owner and repo are taken from the URL.
    pub async fn release_notes_from_url(&self, release_url: &str) -> Result<String> {
        let (owner, repo, tag) = parse_release_url(release_url)?;

        debug!(owner = %owner, repo = %repo, tag = %tag, "Fetching release notes");

        let variables = json!({
            "owner": owner,
            "repo": repo,
            "tag": tag,
        });

        let response = self.graphql::<ReleaseQuery>(RELEASE_QUERY, variables).await?;

        let notes = response
            .repository
            .and_then(|r| r.release)
            .and_then(|r| r.description)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::ReleaseNotFound(tag.clone()))?;

        info!(tag = %tag, bytes = notes.len(), "Fetched release notes");

        Ok(notes)
    }
}
