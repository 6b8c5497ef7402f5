//! Release-notes parsing and notes-source selection
//!
//! GitHub's generated release notes list one merged pull request per line:
//!
//! ```text
//! * Fix the frobnicator by @octocat in https://github.com/acme/widgets/pull/123
//! ```
//!
//! [`extract_pull_requests`] pulls those references back out of the text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

// Pre-compiled pattern for generated release-notes lines. The pattern is
// hard-coded and known-valid, so a failure to compile is unreachable.
static PR_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"\* .+ by @(\S+) in (https://github\.com/[^/\s]+/[^/\s]+/pull/(\d+))") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// A pull request referenced in release notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// Pull request number
    pub number: u64,
    /// Pull request URL as it appeared in the notes
    pub url: String,
    /// Handle of the pull request author
    pub author: String,
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} by @{} ({})", self.number, self.author, self.url)
    }
}

/// Extract pull-request references from release notes text
///
/// References are returned in source-text order and are not deduplicated.
/// Lines that don't match the generated-notes shape are skipped; malformed
/// input yields an empty vector, never an error.
pub fn extract_pull_requests(notes: &str) -> Vec<PullRequestRef> {
    let refs: Vec<PullRequestRef> = PR_LINE_RE
        .captures_iter(notes)
        .filter_map(|caps| {
            let author = caps.get(1)?.as_str().to_string();
            let url = caps.get(2)?.as_str().to_string();
            let number = caps.get(3)?.as_str().parse().ok()?;
            Some(PullRequestRef {
                number,
                url,
                author,
            })
        })
        .collect();

    debug!(count = refs.len(), "Extracted pull-request references");

    refs
}

/// Where the release notes for a run come from
///
/// The three sources are mutually exclusive and checked in priority order:
/// an explicit release URL, explicit notes text, then the release body of
/// the GitHub Actions event that triggered the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesSource {
    /// Fetch the notes from a release URL
    ReleaseUrl(String),
    /// Notes text supplied directly
    Inline(String),
    /// Release body taken from the triggering event payload
    Event(String),
}

impl NotesSource {
    /// Select the notes source from the available inputs
    ///
    /// Absence of all three sources is a fatal configuration error.
    pub fn select(release_url: Option<String>, notes: Option<String>) -> Result<Self> {
        if let Some(url) = release_url {
            return Ok(NotesSource::ReleaseUrl(url));
        }

        if let Some(text) = notes {
            return Ok(NotesSource::Inline(text));
        }

        if let Some(body) = event_release_body()? {
            return Ok(NotesSource::Event(body));
        }

        Err(Error::Config(
            "No release notes available. Pass --release-url or --notes, or run \
             from a release event with GITHUB_EVENT_PATH set"
                .to_string(),
        ))
    }
}

/// Read the release body from the triggering GitHub Actions event, if any
///
/// Returns `Ok(None)` when GITHUB_EVENT_PATH is unset or the event carries
/// no release body; file and JSON errors are propagated.
pub fn event_release_body() -> Result<Option<String>> {
    let Ok(path) = std::env::var("GITHUB_EVENT_PATH") else {
        return Ok(None);
    };

    debug!(path = %path, "Reading event payload");

    let contents = std::fs::read_to_string(&path)?;
    let event: serde_json::Value = serde_json::from_str(&contents)?;

    let body = event
        .pointer("/release/body")
        .and_then(|b| b.as_str())
        .map(str::to_string)
        .filter(|b| !b.is_empty());

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_generated_notes() {
        let notes = "## What's Changed\n\
                     * c1 by @u1 in https://github.com/o/r/pull/123\n\
                     * c2 by @u2 in https://github.com/o/r/pull/124";

        let refs = extract_pull_requests(notes);

        assert_eq!(
            refs,
            vec![
                PullRequestRef {
                    number: 123,
                    url: "https://github.com/o/r/pull/123".to_string(),
                    author: "u1".to_string(),
                },
                PullRequestRef {
                    number: 124,
                    url: "https://github.com/o/r/pull/124".to_string(),
                    author: "u2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_extract_preserves_source_order_and_duplicates() {
        let notes = "\
            * second first by @b in https://github.com/o/r/pull/9\n\
            * then the first by @a in https://github.com/o/r/pull/2\n\
            * again by @b in https://github.com/o/r/pull/9\n";

        let refs = extract_pull_requests(notes);
        let numbers: Vec<u64> = refs.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![9, 2, 9]);
    }

    #[test]
    fn test_extract_no_matches() {
        let refs = extract_pull_requests("No changes in this release");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract_pull_requests("").is_empty());
    }

    #[test]
    fn test_extract_skips_malformed_lines() {
        let notes = "## What's Changed\n\
                     * invalid format\n\
                     * another invalid format\n\
                     * missing url by @someone\n\
                     * not a pull link by @x in https://github.com/o/r/issues/5";

        assert!(extract_pull_requests(notes).is_empty());
    }

    #[test]
    fn test_extract_mixed_lines() {
        let notes = "* broken line\n\
                     * real change by @dev in https://github.com/acme/widgets/pull/7\n\
                     unrelated prose";

        let refs = extract_pull_requests(notes);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].author, "dev");
        assert_eq!(refs[0].number, 7);
        assert_eq!(refs[0].url, "https://github.com/acme/widgets/pull/7");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let notes = "* change by @dev in https://github.com/acme/widgets/pull/31";
        assert_eq!(extract_pull_requests(notes), extract_pull_requests(notes));
    }

    #[test]
    fn test_extract_rejects_author_with_whitespace() {
        // The handle capture is whitespace-delimited; "by @" followed by a
        // space never matches.
        let notes = "* change by @ someone in https://github.com/o/r/pull/12";
        assert!(extract_pull_requests(notes).is_empty());
    }

    #[test]
    fn test_select_prefers_release_url() {
        let source = NotesSource::select(
            Some("https://github.com/o/r/releases/tag/v1".to_string()),
            Some("inline".to_string()),
        )
        .unwrap();

        assert_eq!(
            source,
            NotesSource::ReleaseUrl("https://github.com/o/r/releases/tag/v1".to_string())
        );
    }

    #[test]
    fn test_select_falls_back_to_inline_notes() {
        let source = NotesSource::select(None, Some("* notes".to_string())).unwrap();
        assert_eq!(source, NotesSource::Inline("* notes".to_string()));
    }

    #[test]
    fn test_pull_request_ref_display() {
        let pr = PullRequestRef {
            number: 5,
            url: "https://github.com/o/r/pull/5".to_string(),
            author: "dev".to_string(),
        };
        assert_eq!(pr.to_string(), "#5 by @dev (https://github.com/o/r/pull/5)");
    }
}
