//! One page generation run.
//!
//! The steps are strictly sequential:
//! 1. Check the API credential (before any network call)
//! 2. Check that the output directory is writable
//! 3. Fetch trending videos, then news headlines
//! 4. Render the page in memory
//! 5. Overwrite the output file
//!
//! Any error aborts the run before step 5, so a failed run leaves the
//! previous page in place.

use std::path::PathBuf;

use chrono::Local;
use tracing::{info, instrument};

use crate::cli::Cli;
use crate::errors::AppError;
use crate::models::PageContext;
use crate::outputs::{html, site};
use crate::sources::google_news::{self, NewsLocale};
use crate::sources::{HttpFetch, youtube};
use crate::utils::ensure_writable_dir;

/// Name of the environment variable holding the API key.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Inputs of a run, independent of how they were collected.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub api_key: Option<String>,
    pub region: String,
    pub locale: NewsLocale,
    pub max_videos: u8,
    pub max_news: usize,
    pub output: PathBuf,
}

impl From<Cli> for RunSettings {
    fn from(cli: Cli) -> Self {
        Self {
            api_key: cli.youtube_api_key,
            locale: NewsLocale::new(&cli.language, &cli.region),
            region: cli.region,
            max_videos: cli.max_videos,
            max_news: cli.max_news,
            output: cli.output,
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub videos: usize,
    pub news: usize,
    pub bytes: usize,
    pub output: PathBuf,
}

/// Return the credential, or a configuration error if it is missing or blank.
pub fn require_api_key(api_key: Option<&str>) -> Result<&str, AppError> {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(AppError::Configuration(format!(
            "{API_KEY_ENV} is not set; export it or pass --youtube-api-key"
        ))),
    }
}

/// Fetch both sources, render the page and write it.
#[instrument(level = "info", skip_all, fields(output = %settings.output.display()))]
pub async fn run<F: HttpFetch>(settings: &RunSettings, http: &F) -> Result<RunReport, AppError> {
    let api_key = require_api_key(settings.api_key.as_deref())?;

    ensure_writable_dir(&settings.output).await?;

    let videos =
        youtube::fetch_most_popular(http, api_key, &settings.region, settings.max_videos).await?;
    let news = google_news::fetch_top_stories(http, &settings.locale, settings.max_news).await?;

    let ctx = PageContext {
        videos,
        news,
        generated_at: Local::now(),
    };
    let page = html::render_page(&ctx);

    site::write_page(&settings.output, &page).await?;

    let report = RunReport {
        videos: ctx.videos.len(),
        news: ctx.news.len(),
        bytes: page.len(),
        output: settings.output.clone(),
    };
    info!(videos = report.videos, news = report.news, bytes = report.bytes, "Page generated");
    Ok(report)
}
