//! Relsweep CLI - move released issues across the project board
//!
//! Reads release notes, finds the issues closed by each referenced pull
//! request, and sets their status field on a GitHub Projects (v2) board.

mod commands;

use clap::{Parser, Subcommand};
use relsweep_core::{Config, Overrides};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ExtractArgs, RunArgs};

/// Relsweep: sweep released issues to a target project status
#[derive(Parser, Debug)]
#[command(name = "relsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Sweep release notes into project status updates
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Extract pull-request references from release notes without updating anything
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("relsweep {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Extract(args)) => {
            args.execute(cli.verbose).await?;
        }
        Some(Commands::Config) => {
            let config = Config::load_with_overrides(Overrides::default())?;

            println!("Relsweep Configuration");
            println!("======================");
            println!();
            println!("Project:");
            println!(
                "  number: {}",
                config
                    .project
                    .number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!(
                "  organization: {}",
                config.project.organization.as_deref().unwrap_or("(user-scoped)")
            );
            println!("  status_field: {}", config.project.status_field);
            println!("  target_status: {}", config.project.target_status);
            println!();
            println!(
                "Repository: {}",
                config
                    .repository
                    .slug
                    .as_deref()
                    .unwrap_or("(detected from git remote)")
            );
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Relsweep - sweep released issues to a target project status");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
