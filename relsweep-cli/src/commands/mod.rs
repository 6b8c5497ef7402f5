//! CLI command implementations

pub mod extract;
pub mod run;

pub use extract::ExtractArgs;
pub use run::RunArgs;

use relsweep_core::{repo, NotesSource, Secrets};
use relsweep_github::GitHubClient;

/// Load the GitHub token from the environment or the secrets file
pub(crate) fn github_token() -> anyhow::Result<String> {
    let secrets = Secrets::load()?;
    secrets.github_token().ok_or_else(|| {
        anyhow::anyhow!(
            "GitHub token not found. Set GITHUB_TOKEN or add it to \
             ~/.config/relsweep/secrets.toml"
        )
    })
}

/// Build a client for the configured repository, falling back to the
/// enclosing checkout's remote when no slug is configured
pub(crate) fn build_client(token: &str, slug: Option<&str>) -> anyhow::Result<GitHubClient> {
    let url = match slug {
        Some(slug) => slug.to_string(),
        None => repo::detect_remote_url(".")?,
    };

    GitHubClient::from_url(token, &url).map_err(Into::into)
}

/// Turn a resolved notes source into notes text, fetching by URL if needed
pub(crate) async fn resolve_notes(
    client: &GitHubClient,
    source: NotesSource,
) -> anyhow::Result<String> {
    match source {
        NotesSource::ReleaseUrl(url) => Ok(client.release_notes_from_url(&url).await?),
        NotesSource::Inline(text) | NotesSource::Event(text) => Ok(text),
    }
}
