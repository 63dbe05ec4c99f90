//! # trending_page
//!
//! Generates a static page with the trending YouTube videos of a region and
//! the Google News top stories of the matching edition. Meant to run from a
//! scheduler (for example a CI cron job) that publishes the resulting file.
//!
//! ## Usage
//!
//! ```sh
//! YOUTUBE_API_KEY=... trending_page -o public/index.html
//! ```
//!
//! ## Architecture
//!
//! The run is a one-way pipeline:
//! 1. **Fetching**: one request to the video listing API, one to the news feed
//! 2. **Rendering**: both lists plus a timestamp become one HTML document
//! 3. **Output**: the document overwrites the output file
//!
//! Any failure ends the process with a non-zero exit status and leaves the
//! previous output untouched.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod errors;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod utils;

use cli::Cli;
use errors::AppError;
use pipeline::RunSettings;
use sources::ReqwestFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trending_page starting up");

    let args = Cli::parse();
    debug!(
        output = %args.output.display(),
        region = %args.region,
        language = %args.language,
        max_videos = args.max_videos,
        max_news = args.max_news,
        "Parsed CLI arguments"
    );

    match execute(args).await {
        Ok(report) => {
            let elapsed = start_time.elapsed();
            info!(
                ?elapsed,
                videos = report.videos,
                news = report.news,
                path = %report.output.display(),
                "Execution complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, request_error = e.is_request_error(), "Run failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[instrument(level = "debug", skip_all)]
async fn execute(args: Cli) -> Result<pipeline::RunReport, AppError> {
    let fetcher = ReqwestFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let settings = RunSettings::from(args);
    pipeline::run(&settings, &fetcher).await
}
