//! The sweep: release notes in, status updates out

use clap::Args;
use relsweep_core::{extract_pull_requests, Config, NotesSource, Overrides};

use super::{build_client, github_token, resolve_notes};

/// Sweep release notes into project status updates
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project (v2) number
    #[arg(short, long)]
    pub project: Option<u64>,

    /// Organization login for organization-scoped projects
    #[arg(short, long)]
    pub organization: Option<String>,

    /// Name of the single-select status field
    #[arg(long)]
    pub status_field: Option<String>,

    /// Status option the swept issues are moved to
    #[arg(long)]
    pub target_status: Option<String>,

    /// Repository (owner/repo format, uses the git remote if not specified)
    #[arg(short, long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Fetch the notes from this release URL
    #[arg(long)]
    pub release_url: Option<String>,

    /// Release notes text to sweep
    #[arg(long, conflicts_with = "release_url")]
    pub notes: Option<String>,

    /// Resolve everything but don't issue any mutations
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(self, verbose: bool) -> anyhow::Result<()> {
        let config = Config::load_with_overrides(Overrides {
            project_number: self.project,
            organization: self.organization,
            status_field: self.status_field,
            target_status: self.target_status,
            repository: self.repo,
        })?;

        let project_number = config.require_project_number()?;

        let token = github_token()?;
        let client = build_client(&token, config.repository.slug.as_deref())?;

        if verbose {
            println!(
                "Sweeping {}/{} into project {}",
                client.owner(),
                client.repo(),
                project_number
            );
        }

        // Fail fast on a bad token or inaccessible repository
        client.test_connection().await?;

        let source = NotesSource::select(self.release_url, self.notes)?;
        let notes = resolve_notes(&client, source).await?;

        let project = client
            .get_project_details(project_number, config.project.organization.as_deref())
            .await?;

        let status_field = project.field(&config.project.status_field).ok_or_else(|| {
            anyhow::anyhow!(
                "Status field \"{}\" not found in project {}",
                config.project.status_field,
                project_number
            )
        })?;

        let pull_requests = extract_pull_requests(&notes);
        println!(
            "Found {} pull requests in release notes",
            pull_requests.len()
        );

        for pr in &pull_requests {
            println!("Processing PR #{}", pr.number);

            let issues = client.get_linked_issues(pr.number).await?;
            println!("Found {} linked issues for PR #{}", issues.len(), pr.number);

            for issue in &issues {
                if self.dry_run {
                    println!(
                        "[dry-run] Would move issue #{} to \"{}\"",
                        issue.number, config.project.target_status
                    );
                    continue;
                }

                println!("Updating project item for issue #{}", issue.number);
                client
                    .update_project_item_status(
                        &project.id,
                        &issue.node_id,
                        status_field,
                        &config.project.target_status,
                    )
                    .await?;
            }
        }

        println!("Successfully processed all pull requests and updated project items");

        Ok(())
    }
}
