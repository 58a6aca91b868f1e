use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "ranch-academy")]
#[command(about = "Ranch Academy - learn Solana by building a ranch")]
#[command(version)]
struct Cli {
    /// Working directory (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Path to the config file (defaults to .ranch-academy/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lesson API server
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List lessons, or show one lesson's steps
    Lessons {
        /// Lesson id
        id: Option<u32>,
    },

    /// Check a source file against a lesson step
    Check {
        lesson: u32,
        step: u32,
        file: PathBuf,

        /// rust or typescript (defaults to the file extension)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Show a learner's progress from the local store
    Progress {
        /// Learner id
        uid: String,
    },

    /// Initialize a configuration file with a fresh API token
    Init {
        /// Write .ranch-academy/config.toml in the working directory
        #[arg(long)]
        local: bool,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let work_dir = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            cli::serve::serve_command(&work_dir, config_path, host, port).await?;
        }
        Some(Commands::Lessons { id }) => {
            cli::lessons::lessons_command(id).await?;
        }
        Some(Commands::Check {
            lesson,
            step,
            file,
            language,
        }) => {
            cli::check::check_command(lesson, step, &file, language).await?;
        }
        Some(Commands::Progress { uid }) => {
            cli::progress::progress_command(&work_dir, config_path, &uid).await?;
        }
        Some(Commands::Init { local, force }) => {
            cli::init::init_command(&work_dir, cli.config.clone(), local, force).await?;
        }
        None => {
            // Default: serve with config defaults
            cli::serve::serve_command(&work_dir, config_path, None, None).await?;
        }
    }

    Ok(())
}
