mod crawl;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bookscrape")]
#[command(about = "Crawl a book catalog and emit normalized product records")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl every listing and detail page reachable from the site root
    Crawl {
        /// Site root to seed the crawl from (overrides `BOOKSCRAPE_ROOT_URL`)
        #[arg(long)]
        root_url: Option<String>,
        /// Stop paginating after this many listing pages
        #[arg(long)]
        max_pages: Option<usize>,
        /// Detail pages fetched concurrently
        #[arg(long)]
        concurrency: Option<usize>,
        /// Write records here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
        format: OutputFormat,
        /// Print the resolved crawl settings without fetching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch and normalize a single detail page
    Page {
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One pretty-printed JSON array
    Json,
    /// One JSON object per line
    Jsonl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = bookscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Crawl {
            root_url,
            max_pages,
            concurrency,
            output,
            format,
            dry_run,
        }) => {
            crawl::apply_overrides(&mut config, root_url, max_pages, concurrency)?;
            crawl::run_crawl(&config, output.as_deref(), format, dry_run).await?;
        }
        Some(Commands::Page { url }) => crawl::run_page(&config, &url).await?,
        None => {
            tracing::info!("no command given; try `bookscrape crawl` or `bookscrape --help`");
        }
    }

    Ok(())
}
