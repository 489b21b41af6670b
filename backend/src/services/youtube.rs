use crate::error::ReportError;
use crate::services::platform::{SearchQuery, VideoDetails, VideoEnrichment, VideoSearch};
use crate::utils::{parse_count, parse_iso8601_to_datetime};
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

/// Client for the YouTube Data API v3.
/// Documentation: https://developers.google.com/youtube/v3/docs
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, ReportError> {
        if api_key.trim().is_empty() {
            return Err(ReportError::Configuration(
                "YOUTUBE_API_KEY environment variable must be set".to_string(),
            ));
        }

        Ok(YouTubeClient {
            client: Client::new(),
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse_with_params(
            &format!("{}/{endpoint}", self.base_url),
            params.iter().map(|(k, v)| (*k, v.as_str())),
        )
        .with_context(|| format!("Invalid YouTube API url for {endpoint}"))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!("YouTube API request: {endpoint} {params:?}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("{endpoint} request failed"))?;
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .with_context(|| format!("Failed to parse {endpoint} response as JSON"))?;

        if !status.is_success() || body.get("error").is_some() {
            let message = body["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(anyhow!("{endpoint} returned {status}: {message}"));
        }

        Ok(body)
    }
}

#[rocket::async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_video_ids(&self, query: &SearchQuery) -> Result<Vec<String>> {
        let params = query.api_params();
        let response = self.get_json("search", &params).await?;
        let video_ids = parse_search_response(&response);
        info!("Search returned {} videos", video_ids.len());
        Ok(video_ids)
    }
}

#[rocket::async_trait]
impl VideoEnrichment for YouTubeClient {
    async fn fetch_video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetails>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("part", "statistics,snippet".to_string()),
            ("id", video_ids.join(",")),
        ];
        let response = self.get_json("videos", &params).await?;
        Ok(parse_videos_response(&response))
    }

    async fn fetch_subscriber_count(&self, channel_id: &str) -> Result<u64> {
        let params = [
            ("part", "statistics".to_string()),
            ("id", channel_id.to_string()),
        ];
        let response = self.get_json("channels", &params).await?;
        Ok(parse_subscriber_count(&response))
    }
}

fn parse_search_response(response: &Value) -> Vec<String> {
    response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"]["videoId"].as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_videos_response(response: &Value) -> Vec<VideoDetails> {
    let Some(items) = response["items"].as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let video_id = item["id"].as_str()?.to_string();
            let snippet = &item["snippet"];
            let stats = &item["statistics"];

            Some(VideoDetails {
                video_id,
                channel_id: snippet["channelId"].as_str().unwrap_or("").to_string(),
                title: snippet["title"].as_str().unwrap_or("").to_string(),
                published_at: parse_iso8601_to_datetime(
                    snippet["publishedAt"].as_str().unwrap_or(""),
                ),
                channel_title: snippet["channelTitle"].as_str().unwrap_or("").to_string(),
                description: snippet["description"].as_str().unwrap_or("").to_string(),
                view_count: parse_count(&stats["viewCount"]),
                like_count: parse_count(&stats["likeCount"]),
                comment_count: parse_count(&stats["commentCount"]),
            })
        })
        .collect()
}

fn parse_subscriber_count(response: &Value) -> u64 {
    parse_count(&response["items"][0]["statistics"]["subscriberCount"])
}
