//! Seams towards the video platform. The pipeline only talks to these
//! traits; [`crate::services::youtube::YouTubeClient`] is the real
//! implementation and tests substitute in-memory fakes.

use crate::services::options::{DurationFilter, RegionPreference, ReportOptions, SearchOrder};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub keyword: String,
    pub max_results: u32,
    pub order: SearchOrder,
    pub published_after: Option<DateTime<Utc>>,
    pub duration: DurationFilter,
    pub region: RegionPreference,
}

impl SearchQuery {
    pub fn from_options(options: &ReportOptions, now: DateTime<Utc>) -> Self {
        SearchQuery {
            keyword: options.keyword.clone(),
            max_results: options.max_results,
            order: options.order,
            published_after: options.time_filter.published_after(now),
            duration: options.duration,
            region: options.region,
        }
    }

    /// Query parameters for search.list, excluding the API key.
    pub fn api_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("q", self.keyword.clone()),
            ("maxResults", self.max_results.to_string()),
            ("order", self.order.key().to_string()),
        ];

        if let Some(after) = self.published_after {
            params.push((
                "publishedAfter",
                after.to_rfc3339_opts(SecondsFormat::Millis, true),
            ));
        }
        if let Some(duration) = self.duration.api_value() {
            params.push(("videoDuration", duration.to_string()));
        }
        if let Some(region_code) = self.region.region_code() {
            params.push(("regionCode", region_code.to_string()));
        }
        if let Some(language) = self.region.language() {
            params.push(("hl", language.to_string()));
            params.push(("relevanceLanguage", language.to_string()));
        }

        params
    }
}

/// Snippet and statistics of one video, before the channel lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub channel_title: String,
    pub description: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

#[rocket::async_trait]
pub trait VideoSearch: Send + Sync {
    /// Candidate video ids; an empty list means "no results".
    async fn search_video_ids(&self, query: &SearchQuery) -> Result<Vec<String>>;
}

#[rocket::async_trait]
pub trait VideoEnrichment: Send + Sync {
    async fn fetch_video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetails>>;

    /// Subscriber count of a channel, 0 when the channel is missing or hides it.
    async fn fetch_subscriber_count(&self, channel_id: &str) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query() -> SearchQuery {
        SearchQuery {
            keyword: "lofi beats".to_string(),
            max_results: 20,
            order: SearchOrder::Date,
            published_after: None,
            duration: DurationFilter::Any,
            region: RegionPreference::Worldwide,
        }
    }

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn worldwide_unfiltered_query_has_only_base_params() {
        let params = query().api_params();
        assert_eq!(param(&params, "q"), Some("lofi beats"));
        assert_eq!(param(&params, "maxResults"), Some("20"));
        assert_eq!(param(&params, "order"), Some("date"));
        assert_eq!(param(&params, "type"), Some("video"));
        assert!(param(&params, "publishedAfter").is_none());
        assert!(param(&params, "videoDuration").is_none());
        assert!(param(&params, "regionCode").is_none());
        assert!(param(&params, "hl").is_none());
    }

    #[test]
    fn japan_region_prefers_japanese() {
        let mut q = query();
        q.region = RegionPreference::Japan;
        q.duration = DurationFilter::Short;
        q.published_after = Some(Utc.with_ymd_and_hms(2025, 2, 12, 0, 0, 0).unwrap());

        let params = q.api_params();
        assert_eq!(param(&params, "regionCode"), Some("JP"));
        assert_eq!(param(&params, "hl"), Some("ja"));
        assert_eq!(param(&params, "relevanceLanguage"), Some("ja"));
        assert_eq!(param(&params, "videoDuration"), Some("short"));
        assert_eq!(
            param(&params, "publishedAfter"),
            Some("2025-02-12T00:00:00.000Z")
        );
    }
}
