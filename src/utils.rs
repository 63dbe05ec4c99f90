//! Utility functions for markup escaping, number formatting, log previews,
//! and file system checks.
//!
//! This module provides helpers used throughout the application:
//! - HTML escaping for untrusted feed text
//! - Thousands grouping for view counts
//! - String truncation for logging response bodies
//! - File system validation for the output directory

use itertools::Itertools;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::errors::AppError;

/// Escape text for use in HTML element content or a quoted attribute value.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with their character references.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(escape_html("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format an integer with a space between every group of three digits.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(group_thousands(1234567), "1 234 567");
/// assert_eq!(group_thousands(999), "999");
/// ```
pub fn group_thousands(n: u64) -> String {
    let digits: Vec<char> = n.to_string().chars().collect();
    digits
        .rchunks(3)
        .rev()
        .map(|group| group.iter().collect::<String>())
        .join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary not past `max` bytes,
/// with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `output` exists and is writable.
///
/// The directory is created if missing, then a probe file is created and
/// removed next to the output. The output file itself is never opened.
///
/// # Errors
///
/// Returns [`AppError::Output`] if the directory cannot be created or a file
/// cannot be created inside it.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub async fn ensure_writable_dir(output: &Path) -> Result<(), AppError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).await.map_err(|source| AppError::Output {
        path: dir.to_path_buf(),
        source,
    })?;

    let probe_path = dir.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            remove_probe(&probe_path);
            info!(dir = %dir.display(), "Output directory is writable");
            Ok(())
        }
        Err(source) => Err(AppError::Output {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Delete the writability probe, logging a warning if it stays behind.
fn remove_probe(probe_path: &Path) -> bool {
    match stdfs::remove_file(probe_path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %probe_path.display(), error = %e, "Could not remove write probe");
            false
        }
    }
}
