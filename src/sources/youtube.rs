//! YouTube Data API "most popular" chart.
//!
//! Requests `videos?chart=mostPopular` for one region and maps every item to
//! a [`VideoRecord`]. The listing returns `viewCount` as a decimal string
//! inside `statistics`; either may be missing (for example when the owner
//! hides statistics), in which case the view count stays unknown.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::HttpFetch;
use crate::errors::AppError;
use crate::models::VideoRecord;
use crate::utils::truncate_for_log;

/// Listing endpoint of the YouTube Data API v3.
pub const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

const SOURCE_NAME: &str = "YouTube";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    /// Documented as a decimal string; accepted as a number too.
    #[serde(default)]
    view_count: Option<Value>,
}

/// Fetch the trending videos for `region` (ISO 3166-1 alpha-2).
///
/// At most `max_results` records are returned, in the order the API ranks
/// them. Fewer come back when the chart is shorter.
///
/// # Errors
///
/// - [`AppError::Http`] / [`AppError::Network`] when the request fails
/// - [`AppError::Parse`] when the body is not a video listing
#[instrument(level = "info", skip(http, api_key))]
pub async fn fetch_most_popular<F: HttpFetch>(
    http: &F,
    api_key: &str,
    region: &str,
    max_results: u8,
) -> Result<Vec<VideoRecord>, AppError> {
    let max = max_results.to_string();
    let query = [
        ("part", "snippet,statistics,contentDetails"),
        ("chart", "mostPopular"),
        ("regionCode", region),
        ("maxResults", max.as_str()),
        ("key", api_key),
    ];

    let body = http.get_text(VIDEOS_ENDPOINT, &query).await?;
    let videos = parse_video_list(&body, usize::from(max_results))?;

    info!(count = videos.len(), %region, "Fetched trending videos");
    Ok(videos)
}

/// Parse a `videos.list` response body.
fn parse_video_list(body: &str, max_results: usize) -> Result<Vec<VideoRecord>, AppError> {
    let listing: VideoListResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, body_preview = %truncate_for_log(body, 300), "Malformed video listing");
        AppError::Parse {
            source_name: SOURCE_NAME,
            reason: e.to_string(),
        }
    })?;

    let videos = listing
        .items
        .into_iter()
        .take(max_results)
        .map(|item| {
            let views = item
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|raw| parse_view_count(&item.id, &raw));
            debug!(id = %item.id, ?views, "Parsed video");
            VideoRecord::new(
                &item.id,
                item.snippet.title.unwrap_or_default(),
                item.snippet.channel_title,
                views,
            )
        })
        .collect();

    Ok(videos)
}

/// An empty or `null` `viewCount` is "unknown". Anything that is not a
/// non-negative integer (as a string or a JSON number) is logged and treated
/// the same way.
fn parse_view_count(video_id: &str, raw: &Value) -> Option<u64> {
    let parsed = match raw {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    if parsed.is_none() {
        warn!(id = %video_id, value = %raw, "Ignoring unparsable viewCount");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::FakeFetcher;
    use serde_json::json;

    const LISTING: &str = r#"{
        "kind": "youtube#videoListResponse",
        "items": [
            {
                "id": "abc123",
                "snippet": {"title": "First <video>", "channelTitle": "Chan & Co"},
                "statistics": {"viewCount": "1234567", "likeCount": "10"},
                "contentDetails": {"duration": "PT4M13S"}
            },
            {
                "id": "def456",
                "snippet": {"title": "No stats"},
                "contentDetails": {"duration": "PT1M"}
            },
            {
                "id": "ghi789",
                "snippet": {"title": "Hidden views", "channelTitle": "Quiet"},
                "statistics": {"likeCount": "3"}
            },
            {
                "id": "jkl000",
                "snippet": {},
                "statistics": {"viewCount": ""}
            }
        ]
    }"#;

    #[test]
    fn test_parse_preserves_order_and_fields() {
        let videos = parse_video_list(LISTING, 15).unwrap();
        let ids: Vec<&str> = videos.iter().map(|v| v.watch_url.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "https://www.youtube.com/watch?v=abc123",
                "https://www.youtube.com/watch?v=def456",
                "https://www.youtube.com/watch?v=ghi789",
                "https://www.youtube.com/watch?v=jkl000",
            ]
        );
        assert_eq!(videos[0].title, "First <video>");
        assert_eq!(videos[0].channel.as_deref(), Some("Chan & Co"));
        assert_eq!(videos[0].views, Some(1_234_567));
        assert_eq!(videos[0].embed_url, "https://www.youtube.com/embed/abc123");
    }

    #[test]
    fn test_missing_view_count_stays_unknown() {
        let videos = parse_video_list(LISTING, 15).unwrap();
        // no statistics object
        assert_eq!(videos[1].views, None);
        assert_eq!(videos[1].channel, None);
        // statistics without viewCount
        assert_eq!(videos[2].views, None);
        // empty viewCount and empty snippet
        assert_eq!(videos[3].views, None);
        assert_eq!(videos[3].title, "");
    }

    #[test]
    fn test_unparsable_view_count_is_unknown() {
        assert_eq!(parse_view_count("x", &json!("lots")), None);
        assert_eq!(parse_view_count("x", &json!(" 42 ")), Some(42));
        assert_eq!(parse_view_count("x", &json!(-5)), None);
        assert_eq!(parse_view_count("x", &json!(1.5)), None);
        assert_eq!(parse_view_count("x", &json!({"n": 1})), None);
        assert_eq!(parse_view_count("x", &Value::Null), None);
    }

    #[test]
    fn test_numeric_view_count_is_accepted() {
        let body = r#"{"items": [
            {"id": "a", "snippet": {"title": "t"}, "statistics": {"viewCount": 123}},
            {"id": "b", "snippet": {"title": "u"}, "statistics": {"viewCount": true}},
            {"id": "c", "snippet": {"title": "v"}, "statistics": {"viewCount": null}}
        ]}"#;
        let videos = parse_video_list(body, 15).unwrap();
        assert_eq!(videos.len(), 3);
        assert_eq!(videos[0].views, Some(123));
        assert_eq!(videos[1].views, None);
        assert_eq!(videos[2].views, None);
    }

    #[test]
    fn test_listing_is_capped_at_max_results() {
        let videos = parse_video_list(LISTING, 2).unwrap();
        assert_eq!(videos.len(), 2);
    }

    #[test]
    fn test_missing_items_is_empty_list() {
        let videos = parse_video_list(r#"{"kind": "youtube#videoListResponse"}"#, 15).unwrap();
        assert!(videos.is_empty());
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = parse_video_list("<html>quota</html>", 15).unwrap_err();
        assert!(matches!(err, AppError::Parse { source_name: "YouTube", .. }));

        let err = parse_video_list(r#"{"items": [{"snippet": {}}]}"#, 15).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_sends_listing_query() {
        let fake = FakeFetcher::new().respond(VIDEOS_ENDPOINT, LISTING);

        let videos = fetch_most_popular(&fake, "secret-key", "RO", 15).await.unwrap();
        assert_eq!(videos.len(), 4);

        let calls = fake.calls();
        assert_eq!(calls.len(), 1);
        let (endpoint, query) = &calls[0];
        assert_eq!(endpoint, VIDEOS_ENDPOINT);
        let get = |k: &str| {
            query
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("part"), Some("snippet,statistics,contentDetails"));
        assert_eq!(get("chart"), Some("mostPopular"));
        assert_eq!(get("regionCode"), Some("RO"));
        assert_eq!(get("maxResults"), Some("15"));
        assert_eq!(get("key"), Some("secret-key"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_request_error() {
        let fake = FakeFetcher::new().fail(VIDEOS_ENDPOINT, 403);

        let err = fetch_most_popular(&fake, "k", "RO", 15).await.unwrap_err();
        assert!(err.is_request_error());
        assert!(matches!(err, AppError::Http { status: 403, .. }));
    }
}
