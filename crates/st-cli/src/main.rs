//! Terminal frontend for storytree: play, check and inspect text stories.

mod commands;
mod config;
mod host;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use st_text::{MetadataPolicy, ParserConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::PlayConfig;

#[derive(Parser)]
#[command(
    name = "storytree",
    about = "storytree - branching text stories in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story interactively
    Play {
        /// Story file
        file: PathBuf,

        /// How to treat unknown metadata keys
        #[arg(long, value_enum, default_value_t = Metadata::Ignore)]
        metadata: Metadata,

        /// Resource directory (default: resources/ next to the story)
        #[arg(long)]
        resources: Option<PathBuf>,

        /// Hide options that are visible but unavailable
        #[arg(long)]
        hide_unavailable: bool,

        /// Print the environment as JSON when the session ends
        #[arg(long)]
        dump_env: bool,

        /// Prompt shown when waiting for the player
        #[arg(long, default_value = "> ")]
        prompt: String,
    },

    /// Parse a story and report problems
    Check {
        /// Story file
        file: PathBuf,

        /// How to treat unknown metadata keys
        #[arg(long, value_enum, default_value_t = Metadata::Ignore)]
        metadata: Metadata,
    },

    /// Show a story's metadata and nodes
    Info {
        /// Story file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Metadata {
    Ignore,
    Warn,
    Reject,
}

impl From<Metadata> for MetadataPolicy {
    fn from(value: Metadata) -> Self {
        match value {
            Metadata::Ignore => MetadataPolicy::Ignore,
            Metadata::Warn => MetadataPolicy::Warn,
            Metadata::Reject => MetadataPolicy::Reject,
        }
    }
}

fn parser_config(metadata: Metadata) -> ParserConfig {
    ParserConfig::default().with_unknown_metadata(metadata.into())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            file,
            metadata,
            resources,
            hide_unavailable,
            dump_env,
            prompt,
        } => {
            let config = PlayConfig::default()
                .with_prompt(prompt)
                .with_show_unavailable(!hide_unavailable)
                .with_resource_dir(resources)
                .with_env_dump(dump_env);
            commands::play::run(&file, parser_config(metadata), &config)
        }
        Commands::Check { file, metadata } => {
            commands::check::run(&file, parser_config(metadata))
        }
        Commands::Info { file } => commands::info::run(&file),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
