//! Derived per-video scores.
//!
//! All three scores are rounded to two decimals and fall back to 0 whenever
//! their denominator is not positive, so a report never shows NaN or infinity.

use crate::models::{VideoMetrics, VideoRecord};
use crate::utils::round_to_hundredths;
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;
const TRENDING_SCALE: f64 = 10_000.0;

pub fn compute_metrics(video: &VideoRecord, now: DateTime<Utc>) -> VideoMetrics {
    VideoMetrics {
        engagement_rate: engagement_rate(video),
        trending_rate: trending_rate(video, now),
        view_sub_ratio: view_sub_ratio(video),
    }
}

/// (likes + comments) / views * 100
pub fn engagement_rate(video: &VideoRecord) -> f64 {
    if video.view_count == 0 {
        return 0.0;
    }
    let interactions = (video.like_count + video.comment_count) as f64;
    round_to_hundredths(interactions / video.view_count as f64 * 100.0)
}

/// Views per elapsed day, scaled down by 10 000.
pub fn trending_rate(video: &VideoRecord, now: DateTime<Utc>) -> f64 {
    let elapsed_days = elapsed_days(video.published_at, now);
    if elapsed_days <= 0.0 {
        return 0.0;
    }
    round_to_hundredths(video.view_count as f64 / elapsed_days / TRENDING_SCALE)
}

pub fn view_sub_ratio(video: &VideoRecord) -> f64 {
    if video.subscriber_count == 0 {
        return 0.0;
    }
    round_to_hundredths(video.view_count as f64 / video.subscriber_count as f64)
}

fn elapsed_days(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - published_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}
