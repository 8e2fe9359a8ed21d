//! # Forbes Newsfeed
//!
//! A small collection service that periodically pulls the latest
//! articles for a configured set of Forbes tags, cleans the article
//! text, deduplicates by URL, and writes the aggregated dataset to a
//! JSON file.
//!
//! ## Usage
//!
//! ```sh
//! forbes_newsfeed --once -o ./news_articles.json
//! ```
//!
//! ## Architecture
//!
//! One run flows strictly in one direction:
//! 1. **Listing**: fetch each configured tag's listing from the
//!    publishing API
//! 2. **Detail**: fetch the full body for every not-yet-seen article
//! 3. **Cleaning**: reduce body paragraphs to plain text
//! 4. **Output**: overwrite the JSON dataset, grouped by tag
//!
//! Requests are throttled by a mandatory delay before every attempt
//! and retried a bounded number of times; all upstream failures
//! degrade to smaller output rather than a failed run.

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tracing::{Instrument, error, info, info_span};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod clean;
mod cli;
mod models;
mod outputs;
mod pipeline;
mod request;
mod scrapers;
mod tags;
mod utils;

use cli::Cli;
use pipeline::Pipeline;
use request::{FetchJson, HttpJson, RetryExecutor, RetryPolicy};
use scrapers::forbes::ForbesApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    info!(service = %args.service_name, "forbes_newsfeed starting up");

    let tag_set = match &args.tags_file {
        Some(path) => tags::load_tags(path).await?,
        None => tags::default_tags(),
    };
    info!(count = tag_set.len(), "Tag configuration loaded");

    // Misconfigured transport (e.g. a malformed proxy address) is the
    // one fatal error; everything after construction degrades instead.
    let transport = HttpJson::new(args.proxy().as_ref())?;
    let policy = RetryPolicy::new(args.max_retries, Duration::from_secs(args.retry_delay));
    let pipeline = Pipeline::new(ForbesApi::new(RetryExecutor::new(transport, policy)));

    let span = info_span!("collector", service = %args.service_name);

    if args.once {
        run_once(&pipeline, &tag_set, &args.output_file)
            .instrument(span)
            .await;
        return Ok(());
    }

    let period = Duration::from_secs(args.parsing_interval * 60);
    info!(minutes = args.parsing_interval, "Scheduling runs");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately; consume it
    // so the first run happens a full interval after startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        run_once(&pipeline, &tag_set, &args.output_file)
            .instrument(span.clone())
            .await;
    }
}

/// Execute one pipeline run and persist its output.
///
/// Output-write failures are logged, not propagated: the next
/// scheduled run gets a fresh chance.
async fn run_once<T: FetchJson>(
    pipeline: &Pipeline<T>,
    tag_set: &[(String, String)],
    output_file: &str,
) {
    let start_time = std::time::Instant::now();

    let report = pipeline.run(tag_set).await;

    if let Err(e) = outputs::json::write_articles(&report, output_file).await {
        error!(path = %output_file, error = %e, "Failed to write articles file");
    }

    info!(
        elapsed_secs = start_time.elapsed().as_secs(),
        articles = report.articles_fetched,
        duplicates_skipped = report.duplicates_skipped,
        mismatches = report.mismatches,
        "Run complete"
    );
}
