mod commands;

use clap::{Parser, Subcommand};
use forgeview_core::config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "forgeview",
    version,
    about = "Issue reference linking and project picking for forge UIs",
    long_about = "forgeview rewrites `#123` issue references in rendered markdown into links\n\
        and filters project lists the way the project picker does.\n\n\
        Quick start:\n  \
        forgeview rewrite --catalog catalog.json --project acme/widgets < comment.html\n  \
        forgeview select --catalog catalog.json --query widg\n  \
        forgeview doctor --catalog catalog.json"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: .forgeview/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link issue references in rendered HTML
    ///
    /// Reads HTML from --input or stdin and prints it with every resolvable
    /// `#<number>` reference replaced by a link. Text inside links, code and
    /// pre blocks is left alone.
    ///
    /// Example: forgeview rewrite --catalog catalog.json --project acme/widgets --input comment.html
    Rewrite {
        /// Catalog JSON with projects and issues
        #[arg(long)]
        catalog: String,

        /// Path of the project the content belongs to
        #[arg(long)]
        project: String,

        /// HTML file to rewrite (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Filter the project list like the project picker
    ///
    /// Prints the ranked entries for a search string. With --activate or
    /// --enter, prints the URL the picker would navigate to instead.
    ///
    /// Examples:
    ///   forgeview select --catalog catalog.json --query widg
    ///   forgeview select --catalog catalog.json --query widg --down 1 --enter
    ///   forgeview select --catalog catalog.json --under acme --json
    Select {
        /// Catalog JSON with projects and issues
        #[arg(long)]
        catalog: String,

        /// Search text
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only list projects at or below this path
        #[arg(long)]
        under: Option<String>,

        /// Path of the project to mark as current
        #[arg(long)]
        current: Option<String>,

        /// Move the highlight down (negative: up) before rendering
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        down: isize,

        /// Activate the highlighted entry
        #[arg(long, conflicts_with = "activate")]
        enter: bool,

        /// Activate the project with this id
        #[arg(long)]
        activate: Option<u64>,

        /// Print the render model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show effective configuration and catalog health
    ///
    /// Example: forgeview doctor --catalog catalog.json
    Doctor {
        /// Catalog JSON to validate
        #[arg(long)]
        catalog: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let root = std::env::current_dir()?;
    let config_file = cli.config.as_deref().map(std::path::Path::new);
    let config = Config::load_with_file(Some(&root), config_file)?;

    let filter = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Rewrite {
            catalog,
            project,
            input,
        } => {
            commands::rewrite::run(
                std::path::Path::new(&catalog),
                &project,
                input.as_deref().map(std::path::Path::new),
                &config,
            )?;
        }
        Commands::Select {
            catalog,
            query,
            under,
            current,
            down,
            enter,
            activate,
            json,
        } => {
            let args = commands::select::SelectArgs {
                query: &query,
                under: under.as_deref(),
                current: current.as_deref(),
                down,
                enter,
                activate,
                json,
            };
            commands::select::run(std::path::Path::new(&catalog), &args, &config)?;
        }
        Commands::Doctor { catalog } => {
            commands::doctor::run(catalog.as_deref().map(std::path::Path::new), &config)?;
        }
    }

    Ok(())
}
