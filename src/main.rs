//! CLI entry point for statusblog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use statusblog::Blog;

#[derive(Parser)]
#[command(name = "statusblog")]
#[command(version)]
#[command(about = "A personal blog generator", long_about = None)]
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
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Fail when any document cannot be resolved
        #[arg(long)]
        strict: bool,
    },

    /// Start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve the generated files only (no watching, no live reload)
        #[arg(long)]
        r#static: bool,

        /// Fail when any document cannot be resolved
        #[arg(long)]
        strict: bool,
    },

    /// Remove the public folder
    Clean,

    /// List site information
    List {
        /// What to list (posts, routes)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "statusblog=debug,info"
    } else {
        "statusblog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            statusblog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New { title } => {
            let blog = Blog::new(&base_dir)?;
            let path = blog.new_post(&title)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch, strict } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Generating static files...");

            let report = blog.generate(strict)?;
            println!("Generated {} pages", report.pages);

            if watch {
                statusblog::commands::generate::watch(&blog, strict).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            r#static,
            strict,
        } => {
            let blog = Blog::new(&base_dir)?;

            tracing::info!("Generating static files...");
            blog.generate(strict)?;

            statusblog::server::start(&blog, &ip, port, !r#static, strict).await?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let blog = Blog::new(&base_dir)?;
            statusblog::commands::list::run(&blog, &r#type, json)?;
        }
    }

    Ok(())
}
