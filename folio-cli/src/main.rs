//! # folio CLI
//!
//! Command-line interface for the folio site build pipeline.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "folio.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new folio project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build pages, manifests and the RSS feed
    Build {
        /// Site base used for absolute URLs in the feed
        #[arg(long, env = "SITE_URL")]
        site_url: Option<String>,

        /// Only build these sections (repeatable)
        #[arg(long = "section", value_name = "NAME")]
        sections: Vec<String>,

        /// Fail when any entry could not be built
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let result = match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build {
            site_url,
            sections,
            strict,
        } => commands::build_site(
            &cli.config,
            commands::BuildOptions {
                site_url,
                sections,
                strict,
            },
        ),
    };

    if let Err(err) = result {
        tracing::error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
