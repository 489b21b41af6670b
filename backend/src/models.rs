use crate::error::ReportError;
use crate::services::layout::LayoutPlan;
use crate::services::leaderboard::Leaderboard;
use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::io::Cursor;

/// One enriched search result. Counters default to 0 when the platform omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub channel_title: String,
    pub description: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub subscriber_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoMetrics {
    pub engagement_rate: f64,
    pub trending_rate: f64,
    pub view_sub_ratio: f64,
}

/// A record with its derived metrics. The metrics are computed once in
/// [`ScoredVideo::new`] and cannot be changed independently of the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredVideo {
    video: VideoRecord,
    metrics: VideoMetrics,
}

impl ScoredVideo {
    pub fn new(video: VideoRecord, now: DateTime<Utc>) -> Self {
        let metrics = crate::services::metrics::compute_metrics(&video, now);
        ScoredVideo { video, metrics }
    }

    pub fn video(&self) -> &VideoRecord {
        &self.video
    }

    pub fn metrics(&self) -> &VideoMetrics {
        &self.metrics
    }
}

/// A scored video together with its 1-based row in the main results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVideo {
    pub position: usize,
    pub scored: ScoredVideo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub title: String,
    pub metric_value: f64,
}

/// Body of `POST /api/report`. Every field is optional on the wire and
/// `max_results` is taken as raw JSON, so a missing keyword or a bad count
/// is reported by option validation as a configuration error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub max_results: Option<serde_json::Value>,
    #[serde(default)]
    pub time_filter: Option<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub keyword: String,
    pub video_count: usize,
    pub sort_applied: bool,
    pub warnings: Vec<String>,
    pub leaderboards: Vec<Leaderboard>,
    pub layout: LayoutPlan,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip)]
    pub status: Status,
}

impl From<&ReportError> for ErrorResponse {
    fn from(err: &ReportError) -> Self {
        ErrorResponse {
            error: err.kind().to_string(),
            message: err.to_string(),
            status: err.status(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
