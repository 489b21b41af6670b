// Shared fakes; not every test binary uses every helper.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use yt_trend_report::models::ReportRequest;
use yt_trend_report::services::platform::{
    SearchQuery, VideoDetails, VideoEnrichment, VideoSearch,
};

/// In-memory stand-in for the video platform.
#[derive(Default)]
pub struct FakePlatform {
    pub details: Vec<VideoDetails>,
    pub subscribers: HashMap<String, u64>,
    pub fail_search: bool,
    pub fail_channels: bool,
    pub search_calls: AtomicUsize,
    pub channel_calls: AtomicUsize,
}

impl FakePlatform {
    pub fn with_videos(details: Vec<VideoDetails>, subscribers: &[(&str, u64)]) -> Self {
        FakePlatform {
            details,
            subscribers: subscribers
                .iter()
                .map(|(channel, count)| (channel.to_string(), *count))
                .collect(),
            ..FakePlatform::default()
        }
    }
}

#[rocket::async_trait]
impl VideoSearch for FakePlatform {
    async fn search_video_ids(&self, _query: &SearchQuery) -> Result<Vec<String>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search {
            return Err(anyhow!("quota exceeded"));
        }
        Ok(self.details.iter().map(|d| d.video_id.clone()).collect())
    }
}

#[rocket::async_trait]
impl VideoEnrichment for FakePlatform {
    async fn fetch_video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetails>> {
        Ok(self
            .details
            .iter()
            .filter(|d| video_ids.contains(&d.video_id))
            .cloned()
            .collect())
    }

    async fn fetch_subscriber_count(&self, channel_id: &str) -> Result<u64> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_channels {
            return Err(anyhow!("channels.list returned 500"));
        }
        Ok(self.subscribers.get(channel_id).copied().unwrap_or(0))
    }
}

pub fn details(
    id: &str,
    channel: &str,
    counts: (u64, u64, u64),
    days_ago: i64,
    now: DateTime<Utc>,
) -> VideoDetails {
    VideoDetails {
        video_id: id.to_string(),
        channel_id: channel.to_string(),
        title: id.to_string(),
        published_at: Some(now - Duration::days(days_ago)),
        channel_title: format!("{channel} title"),
        description: format!("about {id}"),
        view_count: counts.0,
        like_count: counts.1,
        comment_count: counts.2,
    }
}

/// The three-video example: (views, likes, comments, subscribers) =
/// (1000,50,10,500), (0,0,0,100), (2000,100,0,0) published 10, 5 and 1 days ago.
pub fn example_platform(now: DateTime<Utc>) -> FakePlatform {
    FakePlatform::with_videos(
        vec![
            details("video1", "chan1", (1000, 50, 10), 10, now),
            details("video2", "chan2", (0, 0, 0), 5, now),
            details("video3", "chan3", (2000, 100, 0), 1, now),
        ],
        &[("chan1", 500), ("chan2", 100), ("chan3", 0)],
    )
}

pub fn request(keyword: &str, sort_key: &str) -> ReportRequest {
    ReportRequest {
        keyword: keyword.to_string(),
        order: Some("relevance".to_string()),
        max_results: Some(serde_json::json!(10)),
        time_filter: Some("all".to_string()),
        sort_key: Some(sort_key.to_string()),
        duration: Some("any".to_string()),
        region: Some("worldwide".to_string()),
    }
}
