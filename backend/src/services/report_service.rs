//! The report pipeline: validate, search, enrich, score, rank, extract
//! leaderboards, plan the layout and render.
//!
//! External calls run one after another and are not retried. Nothing is
//! written to the surface until every piece of data has been assembled.

use crate::error::{ReportError, Result};
use crate::models::{RankedVideo, ReportRequest, ReportSummary, ScoredVideo, VideoRecord};
use crate::services::layout::{plan_layout, BlockRequest, LayoutPlan, DEFAULT_START_ROW};
use crate::services::leaderboard::{build_leaderboards, Leaderboard};
use crate::services::options::{ReportOptions, SortKey};
use crate::services::platform::{SearchQuery, VideoDetails, VideoEnrichment, VideoSearch};
use crate::services::ranker::rank;
use crate::services::renderer::ReportRenderer;
use crate::services::surface::ReportSurface;
use crate::services::youtube::watch_url;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything the renderer needs, computed without touching any collaborator.
#[derive(Debug)]
pub struct Report {
    pub videos: Vec<RankedVideo>,
    pub warning: Option<String>,
    pub leaderboards: Vec<Leaderboard>,
    pub layout: LayoutPlan,
}

pub fn build_report(records: Vec<VideoRecord>, sort_key: &SortKey, now: DateTime<Utc>) -> Report {
    let scored = records
        .into_iter()
        .map(|record| ScoredVideo::new(record, now))
        .collect();
    let ranking = rank(scored, sort_key);
    let leaderboards = build_leaderboards(&ranking.videos);

    let requests: Vec<BlockRequest> = leaderboards
        .iter()
        .map(|board| BlockRequest {
            label: board.title.clone(),
            metric_name: board.metric.display_name().to_string(),
            entry_count: board.entries.len(),
        })
        .collect();
    let layout = plan_layout(&requests, DEFAULT_START_ROW);

    Report {
        videos: ranking.videos,
        warning: ranking.warning,
        leaderboards,
        layout,
    }
}

#[derive(Clone)]
pub struct ReportService {
    search: Arc<dyn VideoSearch>,
    enrichment: Arc<dyn VideoEnrichment>,
    surface: Arc<dyn ReportSurface>,
}

impl ReportService {
    pub fn new(
        search: Arc<dyn VideoSearch>,
        enrichment: Arc<dyn VideoEnrichment>,
        surface: Arc<dyn ReportSurface>,
    ) -> Self {
        ReportService {
            search,
            enrichment,
            surface,
        }
    }

    pub fn surface(&self) -> &dyn ReportSurface {
        self.surface.as_ref()
    }

    pub async fn run(&self, request: &ReportRequest, now: DateTime<Utc>) -> Result<ReportSummary> {
        let result = self.run_inner(request, now).await;
        if let Err(e) = &result {
            error!("Report for '{}' failed: {e}", request.keyword.trim());
        }
        result
    }

    async fn run_inner(&self, request: &ReportRequest, now: DateTime<Utc>) -> Result<ReportSummary> {
        let options = ReportOptions::from_request(request)?;
        info!("Keyword: {}", options.keyword);
        info!("Order: {} ({})", options.order.display_name(), options.order.key());
        info!("Max results: {}", options.max_results);
        info!("Time filter: {}", options.time_filter.key());
        info!("Sort key: {}", options.sort_key.key());
        info!("Duration: {}", options.duration.display_name());
        info!("Region: {}", options.region.display_name());

        let records = self.collect_videos(&options, now).await?;
        let report = build_report(records, &options.sort_key, now);

        ReportRenderer::new(self.surface.as_ref())
            .render(&report.videos, &report.leaderboards, &report.layout)
            .await
            .map_err(|e| ReportError::external("Rendering the report", e))?;

        Ok(ReportSummary {
            keyword: options.keyword,
            video_count: report.videos.len(),
            sort_applied: report.warning.is_none(),
            warnings: report.warning.into_iter().collect(),
            leaderboards: report.leaderboards,
            layout: report.layout,
        })
    }

    async fn collect_videos(
        &self,
        options: &ReportOptions,
        now: DateTime<Utc>,
    ) -> Result<Vec<VideoRecord>> {
        let query = SearchQuery::from_options(options, now);
        let video_ids = self
            .search
            .search_video_ids(&query)
            .await
            .map_err(|e| ReportError::external("Video search", e))?;
        if video_ids.is_empty() {
            return Err(ReportError::EmptyResult(format!(
                "the search for '{}' returned no videos, try other conditions",
                options.keyword
            )));
        }
        info!("Search returned {} candidates", video_ids.len());

        let details = self
            .enrichment
            .fetch_video_details(&video_ids)
            .await
            .map_err(|e| ReportError::external("Fetching video statistics", e))?;

        let mut subscribers: HashMap<String, u64> = HashMap::new();
        let mut records = Vec::with_capacity(details.len());
        for detail in details {
            let subscriber_count = match subscribers.get(&detail.channel_id) {
                Some(count) => *count,
                None => {
                    let count = self
                        .enrichment
                        .fetch_subscriber_count(&detail.channel_id)
                        .await
                        .map_err(|e| ReportError::external("Fetching channel subscribers", e))?;
                    subscribers.insert(detail.channel_id.clone(), count);
                    count
                }
            };

            if let Some(record) = into_record(detail, subscriber_count) {
                records.push(record);
            }
        }

        if records.is_empty() {
            return Err(ReportError::EmptyResult(
                "no usable video statistics were returned".to_string(),
            ));
        }
        Ok(records)
    }
}

fn into_record(detail: VideoDetails, subscriber_count: u64) -> Option<VideoRecord> {
    let Some(published_at) = detail.published_at else {
        warn!("Skipping video {}: missing publish date", detail.video_id);
        return None;
    };

    Some(VideoRecord {
        url: watch_url(&detail.video_id),
        video_id: detail.video_id,
        title: detail.title,
        published_at,
        channel_title: detail.channel_title,
        description: detail.description,
        view_count: detail.view_count,
        like_count: detail.like_count,
        comment_count: detail.comment_count,
        subscriber_count,
    })
}
