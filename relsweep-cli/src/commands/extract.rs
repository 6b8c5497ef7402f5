//! Preview extraction without touching the project board

use clap::Args;
use relsweep_core::{extract_pull_requests, NotesSource};
use relsweep_github::GitHubClient;

use super::{github_token, resolve_notes};

/// Extract pull-request references from release notes
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Fetch the notes from this release URL
    #[arg(long)]
    pub release_url: Option<String>,

    /// Release notes text to parse
    #[arg(long, conflicts_with = "release_url")]
    pub notes: Option<String>,
}

impl ExtractArgs {
    /// Execute the extract command
    pub async fn execute(self, verbose: bool) -> anyhow::Result<()> {
        let source = NotesSource::select(self.release_url, self.notes)?;

        let notes = match source {
            NotesSource::ReleaseUrl(url) => {
                // The release URL names its own owner/repo; point the client
                // at that repository directly.
                let token = github_token()?;
                let client = GitHubClient::from_url(&token, &url)?;
                resolve_notes(&client, NotesSource::ReleaseUrl(url)).await?
            }
            NotesSource::Inline(text) | NotesSource::Event(text) => text,
        };

        if verbose {
            println!("Parsed {} bytes of release notes", notes.len());
        }

        let refs = extract_pull_requests(&notes);

        if refs.is_empty() {
            println!("No pull-request references found.");
            return Ok(());
        }

        println!("Found {} pull request(s):", refs.len());
        for pr in &refs {
            println!("  {}", pr);
        }

        Ok(())
    }
}
