//! CLI entry point for mdblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdblog")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "Read a Markdown blog: list, filter, search and show posts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts
    #[command(alias = "ls")]
    List {
        /// Only posts with this exact tag ("all" for every post)
        #[arg(short, long)]
        tag: Option<String>,

        /// Case-insensitive search over title, excerpt, tags and category
        #[arg(short, long)]
        query: Option<String>,

        /// Print the HTML fragment instead of text
        #[arg(long)]
        html: bool,
    },

    /// List tags with post counts
    Tags {
        /// Print the filter buttons as HTML
        #[arg(long)]
        html: bool,
    },

    /// Show a single post
    Show {
        /// Post file name, as listed in the post index
        file: String,

        /// Print the rendered HTML instead of text
        #[arg(long)]
        html: bool,
    },

    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdblog=debug,info"
    } else {
        "mdblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { tag, query, html } => {
            let mut blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::list::run(&mut blog, tag.as_deref(), query.as_deref(), html).await?;
        }

        Commands::Tags { html } => {
            let mut blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::tags::run(&mut blog, html).await?;
        }

        Commands::Show { file, html } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::show::run(&blog, &file, html).await?;
        }

        Commands::History { clear } => {
            let blog = mdblog::Blog::new(&base_dir)?;
            mdblog::commands::history::run(&blog, clear)?;
        }

        Commands::Version => {
            println!("mdblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
