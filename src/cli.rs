//! Command-line interface definitions.
//!
//! Every option has the default of the scheduled production run, so the
//! binary is normally invoked with no arguments and only `YOUTUBE_API_KEY`
//! set in the environment.

use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for trending_page.
///
/// # Examples
///
/// ```sh
/// # Scheduled run
/// YOUTUBE_API_KEY=... trending_page
///
/// # Write somewhere else
/// trending_page -o public/index.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// File the page is written to (overwritten)
    #[arg(short, long, default_value = "index.html")]
    pub output: PathBuf,

    /// Region of the trending chart and news edition
    #[arg(long, default_value = "RO")]
    pub region: String,

    /// Language of the news edition
    #[arg(long, default_value = "ro")]
    pub language: String,

    /// Number of videos to request
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u8).range(1..=50))]
    pub max_videos: u8,

    /// Maximum number of headlines
    #[arg(long, default_value_t = 15)]
    pub max_news: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = crate::sources::DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}
