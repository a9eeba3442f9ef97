use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use city_scrapers::config::Config;
use city_scrapers::constants;
use city_scrapers::crawler::{self, HttpFetcher};
use city_scrapers::logging;
use city_scrapers::types::Meeting;
use city_scrapers::{MeetingNormalizer, SpiderRegistry};

#[derive(Parser)]
#[command(name = "city_scrapers")]
#[command(about = "Los Angeles city agency meeting scrapers")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available spiders
    List,
    /// Fetch a spider's start URLs and print normalized meetings as JSON lines
    Crawl {
        #[arg(long)]
        spider: String,
    },
    /// Normalize a saved API response instead of fetching it
    Parse {
        #[arg(long)]
        spider: String,
        /// JSON response body saved to disk
        #[arg(long)]
        file: PathBuf,
        /// URL the response was fetched from, recorded as each meeting's source
        #[arg(long)]
        url: String,
    },
}

fn print_meetings<'a>(meetings: impl Iterator<Item = &'a Meeting>) -> Result<usize> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut count = 0;
    for meeting in meetings {
        serde_json::to_writer(&mut out, meeting)?;
        writeln!(out)?;
        count += 1;
    }
    Ok(count)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let registry = SpiderRegistry::new();
    let now = chrono::Local::now().naive_local();

    match cli.command {
        Commands::List => {
            for name in constants::get_supported_spiders() {
                let adapter = registry.get(name)?;
                println!("{}\t{}\t{}", name, adapter.agency(), adapter.timezone());
                for url in adapter.start_urls(&config) {
                    println!("\t{}", url);
                }
            }
        }
        Commands::Crawl { spider } => {
            let adapter = registry.get(&spider)?;
            let fetcher = HttpFetcher::new(&config.http)?;
            let result = crawler::crawl(adapter, &config, &fetcher, now).await;

            let count = print_meetings(result.meetings.iter())?;
            info!(spider = %spider, meetings = count, errors = result.errors.len(), "Crawl finished");
            for e in &result.errors {
                warn!("{}", e);
            }
        }
        Commands::Parse { spider, file, url } => {
            let adapter = registry.get(&spider)?;
            let body = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let payload: serde_json::Value = serde_json::from_str(&body)?;

            let normalizer = MeetingNormalizer::new(adapter, now);
            let meetings: Vec<Meeting> = normalizer.normalize_payload(&payload, &url)?.collect();
            let count = print_meetings(meetings.iter())?;
            info!(spider = %spider, meetings = count, "Parse finished");
        }
    }

    Ok(())
}
