//! Google News top stories RSS feed.
//!
//! The feed needs no key. Locale and edition are selected with the `hl`,
//! `gl` and `ceid` query parameters, e.g. `hl=ro&gl=RO&ceid=RO:ro`.
//!
//! # Feed shape
//!
//! ```text
//! <rss version="2.0">
//!   <channel>
//!     <title>…</title>
//!     <item><title>…</title><link>…</link><source url="…">…</source></item>
//!     …
//!   </channel>
//! </rss>
//! ```
//!
//! Only `title` and `link` are read. RSS does not require either of them, so
//! a missing element becomes an empty string rather than an error. Markup
//! nested inside either element contributes its text.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, info, instrument, warn};

use super::HttpFetch;
use crate::errors::AppError;
use crate::models::NewsItem;
use crate::utils::truncate_for_log;

/// Top stories feed.
pub const FEED_ENDPOINT: &str = "https://news.google.com/rss";

const SOURCE_NAME: &str = "Google News";

/// Language and country of the news edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsLocale {
    /// ISO 639-1 language code, e.g. `ro`.
    pub language: String,
    /// ISO 3166-1 alpha-2 country code, e.g. `RO`.
    pub country: String,
}

impl NewsLocale {
    pub fn new(language: &str, country: &str) -> Self {
        Self {
            language: language.to_string(),
            country: country.to_string(),
        }
    }

    /// Edition id in the form Google News expects (`RO:ro`).
    pub fn ceid(&self) -> String {
        format!("{}:{}", self.country, self.language)
    }
}

impl Default for NewsLocale {
    fn default() -> Self {
        Self::new("ro", "RO")
    }
}

/// Which `<item>` child the reader is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
}

/// Fetch up to `max_items` top stories for `locale`, in feed order.
///
/// # Errors
///
/// - [`AppError::Http`] / [`AppError::Network`] when the request fails
/// - [`AppError::Parse`] when the body is not an RSS document with a channel
#[instrument(level = "info", skip(http))]
pub async fn fetch_top_stories<F: HttpFetch>(
    http: &F,
    locale: &NewsLocale,
    max_items: usize,
) -> Result<Vec<NewsItem>, AppError> {
    let ceid = locale.ceid();
    let query = [
        ("hl", locale.language.as_str()),
        ("gl", locale.country.as_str()),
        ("ceid", ceid.as_str()),
    ];

    let body = http.get_text(FEED_ENDPOINT, &query).await?;
    let items = parse_feed(&body, max_items)?;

    info!(count = items.len(), edition = %ceid, "Fetched news headlines");
    Ok(items)
}

/// Parse an RSS 2.0 document into headlines.
///
/// Only `<item>` elements directly under `rss > channel` are read. Entries
/// with neither a title nor a link are dropped before the `max_items` cap is
/// applied.
fn parse_feed(body: &str, max_items: usize) -> Result<Vec<NewsItem>, AppError> {
    let mut reader = Reader::from_str(body);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut saw_channel = false;
    let mut parsed: Vec<NewsItem> = Vec::new();
    let mut current: Option<NewsItem> = None;
    let mut field: Option<ItemField> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| malformed(body, e.to_string()))?;
        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                match (path.len(), name.as_slice()) {
                    (1, b"channel") => saw_channel = true,
                    (2, b"item") if path[1].as_slice() == b"channel" => {
                        current = Some(NewsItem::default());
                    }
                    (3, b"title") if current.is_some() => field = Some(ItemField::Title),
                    (3, b"link") if current.is_some() => field = Some(ItemField::Link),
                    _ => {}
                }
                path.push(name);
            }
            Event::Empty(e) => match (path.len(), e.name().as_ref()) {
                (1, b"channel") => saw_channel = true,
                (2, b"item") if path[1].as_slice() == b"channel" => {
                    parsed.push(NewsItem::default());
                }
                _ => {}
            },
            Event::End(_) => {
                path.pop();
                match path.len() {
                    3 => field = None,
                    2 => {
                        if let Some(item) = current.take() {
                            parsed.push(item);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                let text = t.decode().map_err(|e| malformed(body, e.to_string()))?;
                append_text(&mut current, field, &text);
            }
            Event::CData(c) => {
                let text = c.decode().map_err(|e| malformed(body, e.to_string()))?;
                append_text(&mut current, field, &text);
            }
            Event::GeneralRef(r) => {
                let text = match r
                    .resolve_char_ref()
                    .map_err(|e| malformed(body, e.to_string()))?
                {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = r.decode().map_err(|e| malformed(body, e.to_string()))?;
                        match resolve_predefined_entity(&name) {
                            Some(resolved) => resolved.to_string(),
                            None => format!("&{name};"),
                        }
                    }
                };
                append_text(&mut current, field, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(malformed(body, "unexpected end of document".to_string()));
    }
    if !saw_channel {
        return Err(malformed(body, "missing <channel> element".to_string()));
    }

    let total = parsed.len();
    let items: Vec<NewsItem> = parsed
        .into_iter()
        .map(|item| NewsItem {
            title: item.title.trim().to_string(),
            link: item.link.trim().to_string(),
        })
        .filter(|item| !item.is_blank())
        .take(max_items)
        .collect();

    debug!(total, kept = items.len(), "Parsed feed items");
    Ok(items)
}

fn append_text(current: &mut Option<NewsItem>, field: Option<ItemField>, text: &str) {
    match (current.as_mut(), field) {
        (Some(item), Some(ItemField::Title)) => item.title.push_str(text),
        (Some(item), Some(ItemField::Link)) => item.link.push_str(text),
        _ => {}
    }
}

fn malformed(body: &str, reason: String) -> AppError {
    warn!(error = %reason, body_preview = %truncate_for_log(body, 300), "Malformed news feed");
    AppError::Parse {
        source_name: SOURCE_NAME,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::FakeFetcher;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <generator>NFE/5.0</generator>
    <title>Știri principale - Google Știri</title>
    <link>https://news.google.com/?hl=ro&amp;gl=RO&amp;ceid=RO:ro</link>
    <language>ro</language>
    <item>
      <title>Guvernul &amp; Parlamentul - Digi24</title>
      <link>https://news.google.com/rss/articles/one?oc=5</link>
      <guid isPermaLink="false">one</guid>
      <pubDate>Sat, 17 Oct 2026 08:00:00 GMT</pubDate>
      <description>&lt;a href="x"&gt;x&lt;/a&gt;</description>
      <source url="https://www.digi24.ro">Digi24</source>
    </item>
    <item>
      <title><![CDATA[Vremea <azi> - HotNews]]></title>
      <link>https://news.google.com/rss/articles/two</link>
    </item>
    <item>
      <link>https://news.google.com/rss/articles/three</link>
    </item>
    <item>
      <title>Fără link</title>
    </item>
    <item>
      <pubDate>Sat, 17 Oct 2026 07:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Ultima știre</title>
      <link>https://news.google.com/rss/articles/five</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_feed_reads_titles_and_links_in_order() {
        let items = parse_feed(FEED, 15).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Guvernul & Parlamentul - Digi24",
                "Vremea <azi> - HotNews",
                "",
                "Fără link",
                "Ultima știre",
            ]
        );
        assert_eq!(items[0].link, "https://news.google.com/rss/articles/one?oc=5");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let items = parse_feed(FEED, 15).unwrap();
        assert_eq!(items[2].title, "");
        assert_eq!(items[2].link, "https://news.google.com/rss/articles/three");
        assert_eq!(items[3].link, "");
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let items = parse_feed(FEED, 15).unwrap();
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| !i.is_blank()));
    }

    #[test]
    fn test_feed_is_capped_at_max_items() {
        let items = parse_feed(FEED, 2).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "Vremea <azi> - HotNews");
    }

    #[test]
    fn test_channel_without_items_is_empty_list() {
        let body = r#"<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;
        assert!(parse_feed(body, 15).unwrap().is_empty());
    }

    #[test]
    fn test_document_without_channel_is_parse_error() {
        let err = parse_feed(r#"<rss version="2.0"></rss>"#, 15).unwrap_err();
        assert!(matches!(err, AppError::Parse { source_name: "Google News", .. }));
    }

    #[test]
    fn test_nested_markup_in_title_keeps_text() {
        let body = r#"<rss version="2.0"><channel>
            <item><title>A <b>B</b> &#x43;</title><link>https://example.com/a</link></item>
            <item><title>Next</title><link>https://example.com/b</link></item>
        </channel></rss>"#;

        let items = parse_feed(body, 15).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "A B C");
        assert_eq!(items[1].title, "Next");
    }

    #[test]
    fn test_namespaced_children_are_not_read_as_fields() {
        let body = r#"<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel>
            <item><media:title>Other</media:title><title>Real</title><link>https://example.com/a</link></item>
        </channel></rss>"#;

        let items = parse_feed(body, 15).unwrap();
        assert_eq!(items[0].title, "Real");
    }

    #[test]
    fn test_mismatched_tags_are_parse_error() {
        let err = parse_feed("<rss><channel><item></channel></rss>", 15).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_locale_ceid() {
        assert_eq!(NewsLocale::default().ceid(), "RO:ro");
        assert_eq!(NewsLocale::new("en", "US").ceid(), "US:en");
    }

    #[tokio::test]
    async fn test_fetch_bakes_locale_into_query() {
        let fake = FakeFetcher::new().respond(FEED_ENDPOINT, FEED);

        let items = fetch_top_stories(&fake, &NewsLocale::default(), 15).await.unwrap();
        assert_eq!(items.len(), 5);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            vec![
                ("hl".to_string(), "ro".to_string()),
                ("gl".to_string(), "RO".to_string()),
                ("ceid".to_string(), "RO:ro".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_request_error() {
        let fake = FakeFetcher::new().fail(FEED_ENDPOINT, 502);

        let err = fetch_top_stories(&fake, &NewsLocale::default(), 15)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Http { status: 502, .. }));
    }
}
