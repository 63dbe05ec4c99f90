//! Static HTML page generation.
//!
//! Turns a [`PageContext`] into one self-contained document: styles are
//! inlined and the only remote content is the embedded players and the
//! outbound links.
//!
//! # Layout
//!
//! ```text
//! header   site title + generation time
//! main     ┌ section: grid of video cards ┐ ┌ aside: news list ┐
//! footer   note
//! ```
//!
//! Titles and channel names come from third parties and are escaped. URLs
//! are escaped as attribute values; news links that are not `http(s)` are
//! rendered as plain text.

use std::fmt::Write;

use tracing::{debug, instrument};
use url::Url;

use crate::models::{NewsItem, PageContext, VideoRecord};
use crate::utils::{escape_html, group_thousands};

/// Page title shown in the tab and in the header.
pub const SITE_TITLE: &str = "Top Videos & News";

/// Shown instead of a view count the platform did not report.
pub const UNKNOWN_VIEWS: &str = "—";

/// Header timestamp format.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const STYLE: &str = r#"  :root{--bg:#fafafa;--fg:#111;--muted:#666;--card:#fff;--border:#eee;--link:#0366d6}
  body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Helvetica,Arial,sans-serif;margin:0;background:var(--bg);color:var(--fg)}
  header{position:sticky;top:0;background:#fff;border-bottom:1px solid var(--border);padding:12px 16px}
  header h1{font-size:18px;margin:0}
  header .sub{color:var(--muted);font-size:12px}
  main{max-width:1200px;margin:0 auto;padding:16px;display:grid;grid-template-columns:2fr 1fr;gap:20px}
  .grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:16px}
  .card{background:var(--card);border:1px solid var(--border);border-radius:16px;padding:12px;box-shadow:0 1px 2px rgba(0,0,0,.04)}
  .card h3{font-size:16px;margin:0 0 8px}
  .meta{color:var(--muted);font-size:12px;margin:0 0 10px}
  .frame{position:relative;padding-bottom:56.25%;height:0;overflow:hidden;border-radius:12px;border:1px solid var(--border)}
  .frame iframe{position:absolute;top:0;left:0;width:100%;height:100%;border:0}
  .link{display:inline-block;margin-top:8px;font-size:12px;color:var(--link);text-decoration:none}
  aside .card{padding:16px}
  aside h2{font-size:16px;margin:0 0 8px}
  aside ul{list-style:disc;padding-left:18px;margin:0}
  aside li{margin:8px 0}
  footer{text-align:center;color:var(--muted);font-size:12px;padding:24px}
  @media (max-width:900px){ main{grid-template-columns:1fr} }
"#;

/// Render the full page.
///
/// Never fails; empty lists produce an empty grid and an empty list.
#[instrument(level = "info", skip_all, fields(videos = ctx.videos.len(), news = ctx.news.len()))]
pub fn render_page(ctx: &PageContext) -> String {
    let mut page = String::with_capacity(16 * 1024);
    let title = escape_html(SITE_TITLE);
    let generated = ctx.generated_at.format(TIMESTAMP_FORMAT);

    // Writing into a String cannot fail.
    let _ = write!(
        page,
        r#"<!doctype html>
<html lang="ro">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
{STYLE}</style>
</head>
<body>
<header>
  <h1>{title}</h1>
  <div class="sub">Auto-actualizat • {generated}</div>
</header>
<main>
  <section>
    <div class="grid">
"#
    );

    for video in &ctx.videos {
        page.push_str(&render_video_card(video));
    }

    page.push_str(
        r#"    </div>
  </section>
  <aside>
    <div class="card">
      <h2>Știri populare</h2>
      <ul>
"#,
    );

    for item in &ctx.news {
        page.push_str(&render_news_item(item));
    }

    page.push_str(
        r#"      </ul>
    </div>
  </aside>
</main>
<footer>
  Folosește doar API-uri/embeds oficiale. Adaugă descrieri &amp; categorii pentru SEO/monetizare.
</footer>
</body>
</html>
"#,
    );

    debug!(bytes = page.len(), "Rendered page");
    page
}

/// Human-readable view count, or [`UNKNOWN_VIEWS`].
pub fn format_views(views: Option<u64>) -> String {
    match views {
        Some(n) => format!("{} views", group_thousands(n)),
        None => UNKNOWN_VIEWS.to_string(),
    }
}

fn render_video_card(video: &VideoRecord) -> String {
    let title = escape_html(&video.title);
    let channel = escape_html(video.channel.as_deref().unwrap_or_default());
    let views = format_views(video.views);
    let embed = escape_html(&video.embed_url);
    let watch = escape_html(&video.watch_url);

    format!(
        r#"      <article class="card">
        <h3>{title}</h3>
        <p class="meta">{channel} • {views}</p>
        <div class="frame"><iframe src="{embed}" loading="lazy" allowfullscreen></iframe></div>
        <a class="link" href="{watch}" target="_blank" rel="noopener">Deschide pe YouTube</a>
      </article>
"#
    )
}

/// Headlines without a title show their link as the text.
fn render_news_item(item: &NewsItem) -> String {
    let label = if item.title.trim().is_empty() {
        &item.link
    } else {
        &item.title
    };
    let title = escape_html(label);
    match safe_link(&item.link) {
        Some(href) => format!(
            "        <li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{title}</a></li>\n",
            escape_html(href)
        ),
        None => format!("        <li>{title}</li>\n"),
    }
}

/// The link, if it is an absolute `http`/`https` URL.
fn safe_link(link: &str) -> Option<&str> {
    let parsed = Url::parse(link).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(link)
}
