// src/main.rs

//! adwatch: classified-ads listing watcher CLI.
//!
//! Subscribes a console "subscriber" to a listing page and prints newly
//! appeared listings as they show up. The chat transport that would
//! normally sit in front of the watcher is out of scope here.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use env_logger::Env;

use adwatch::error::Result;
use adwatch::models::{Config, SubscriberId};
use adwatch::notify::{ConsoleSink, NotificationSink};
use adwatch::services::{HttpFetcher, ListingParser, PageFetcher};
use adwatch::store::{MemoryStore, SubscriptionStore};
use adwatch::watch::ListingWatcher;

#[derive(Parser, Debug)]
#[command(
    name = "adwatch",
    version,
    about = "Watches classified-ads listing pages and reports new listings"
)]
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll a listing page on an interval and print new listings
    Watch {
        /// Listing page URL to watch
        url: String,
        /// Subscriber identity for this watch
        #[arg(long, default_value = "console")]
        subscriber: String,
    },
    /// Fetch and parse a listing page once
    Scan {
        /// Listing page URL to scan
        url: String,
        /// Print listings as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    match cli.command {
        Command::Watch { url, subscriber } => run_watch(&config, &url, &subscriber).await,
        Command::Scan { url, json } => run_scan(&config, &url, json).await,
        Command::Validate => run_validate(&config),
    }
}

async fn run_watch(config: &Config, url: &str, subscriber: &str) -> Result<()> {
    config.validate()?;

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.http)?);
    let store: Arc<dyn SubscriptionStore> = Arc::new(MemoryStore::new());
    let sink: Arc<dyn NotificationSink> = Arc::new(ConsoleSink);
    let watcher = ListingWatcher::new(config, fetcher, store, sink);

    let id = SubscriberId::new(subscriber);
    let outcome = watcher.subscribe(id, url).await?;
    log::info!(
        "Baseline established from {} listings; polling every {} min",
        outcome.parsed,
        config.watch.poll_interval_minutes
    );

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    watcher.shutdown().await;
    Ok(())
}

async fn run_scan(config: &Config, url: &str, json: bool) -> Result<()> {
    config.validate()?;

    let fetcher = HttpFetcher::new(&config.http)?;
    let parser = ListingParser::new(config.site.base_url.as_str());

    let html = fetcher.fetch(url).await?;
    let listings = parser.parse(&html);
    log::info!("Parsed {} listings from {url}", listings.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
    } else {
        for listing in &listings {
            println!("{}", listing.render());
        }
    }
    Ok(())
}

fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;
    log::info!("Configuration is valid");
    log::info!("  base_url: {}", config.site.base_url);
    log::info!(
        "  poll_interval_minutes: {}",
        config.watch.poll_interval_minutes
    );
    log::info!("  timeout_secs: {}", config.http.timeout_secs);
    log::info!("  user_agent: {}", config.http.user_agent);
    Ok(())
}
