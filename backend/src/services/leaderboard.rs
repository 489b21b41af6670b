use crate::models::{LeaderboardEntry, RankedVideo, VideoMetrics};
use crate::utils::compare_desc_float;
use serde::Serialize;

pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    EngagementRate,
    TrendingRate,
    ViewSubRatio,
}

impl Metric {
    pub fn all_variants() -> Vec<Self> {
        vec![
            Metric::EngagementRate,
            Metric::TrendingRate,
            Metric::ViewSubRatio,
        ]
    }

    /// Column header and horizontal axis title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::EngagementRate => "Engagement rate",
            Metric::TrendingRate => "Trending rate",
            Metric::ViewSubRatio => "Views / subscribers",
        }
    }

    pub fn value(&self, metrics: &VideoMetrics) -> f64 {
        match self {
            Metric::EngagementRate => metrics.engagement_rate,
            Metric::TrendingRate => metrics.trending_rate,
            Metric::ViewSubRatio => metrics.view_sub_ratio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub metric: Metric,
    pub title: String,
    pub entries: Vec<LeaderboardEntry>,
}

/// Top `n` videos by `metric`, highest first. Ties go to the video placed
/// higher in the main table. Returns fewer than `n` entries when the input
/// is smaller.
pub fn top_n(videos: &[RankedVideo], metric: Metric, n: usize) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = videos
        .iter()
        .map(|ranked| LeaderboardEntry {
            position: ranked.position,
            title: ranked.scored.video().title.clone(),
            metric_value: metric.value(ranked.scored.metrics()),
        })
        .collect();

    entries.sort_by(|a, b| {
        compare_desc_float(a.metric_value, b.metric_value)
            .then(a.position.cmp(&b.position))
    });
    entries.truncate(n);
    entries
}

/// One top-5 leaderboard per metric, in [`Metric::all_variants`] order.
pub fn build_leaderboards(videos: &[RankedVideo]) -> Vec<Leaderboard> {
    Metric::all_variants()
        .into_iter()
        .map(|metric| Leaderboard {
            metric,
            title: format!("{} top {LEADERBOARD_SIZE}", metric.display_name()),
            entries: top_n(videos, metric, LEADERBOARD_SIZE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScoredVideo, VideoRecord};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 19, 0, 0, 0).unwrap()
    }

    fn ranked(position: usize, views: u64, likes: u64, subscribers: u64) -> RankedVideo {
        RankedVideo {
            position,
            scored: ScoredVideo::new(
                VideoRecord {
                    video_id: format!("v{position}"),
                    title: format!("video {position}"),
                    url: String::new(),
                    published_at: now() - Duration::days(1),
                    channel_title: String::new(),
                    description: String::new(),
                    view_count: views,
                    like_count: likes,
                    comment_count: 0,
                    subscriber_count: subscribers,
                },
                now(),
            ),
        }
    }

    #[test]
    fn picks_highest_metric_first() {
        let videos = vec![
            ranked(1, 100, 1, 0),
            ranked(2, 100, 9, 0),
            ranked(3, 100, 5, 0),
        ];
        let entries = top_n(&videos, Metric::EngagementRate, 5);

        let positions: Vec<usize> = entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, [2, 3, 1]);
        assert_eq!(entries[0].metric_value, 9.0);
        assert_eq!(entries[0].title, "video 2");
    }

    #[test]
    fn truncates_to_n() {
        let videos: Vec<RankedVideo> = (1..=8).map(|p| ranked(p, 1000, p as u64, 10)).collect();
        let entries = top_n(&videos, Metric::EngagementRate, 5);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].position, 8);
        assert_eq!(entries[4].position, 4);
    }

    #[test]
    fn short_input_is_not_padded() {
        let videos = vec![ranked(1, 10, 1, 1)];
        assert_eq!(top_n(&videos, Metric::ViewSubRatio, 5).len(), 1);
        assert!(top_n(&[], Metric::TrendingRate, 5).is_empty());
    }

    #[test]
    fn ties_prefer_main_table_position() {
        let videos = vec![ranked(3, 0, 0, 0), ranked(1, 0, 0, 0), ranked(2, 0, 0, 0)];
        let entries = top_n(&videos, Metric::ViewSubRatio, 5);
        let positions: Vec<usize> = entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, [1, 2, 3]);
    }

    #[test]
    fn builds_one_board_per_metric() {
        let videos = vec![ranked(1, 200, 10, 100), ranked(2, 50, 10, 10)];
        let boards = build_leaderboards(&videos);

        assert_eq!(boards.len(), 3);
        assert_eq!(boards[0].metric, Metric::EngagementRate);
        assert_eq!(boards[0].title, "Engagement rate top 5");
        assert_eq!(boards[0].entries[0].position, 2);
        assert_eq!(boards[2].metric, Metric::ViewSubRatio);
        assert_eq!(boards[2].entries[0].position, 2);
        assert_eq!(boards[2].entries[0].metric_value, 5.0);
    }

    proptest! {
        #[test]
        fn returns_min_of_n_and_input_sorted(
            likes in prop::collection::vec(0u64..20, 0..15),
            n in 0usize..8,
        ) {
            let videos: Vec<RankedVideo> = likes
                .iter()
                .enumerate()
                .map(|(i, l)| ranked(i + 1, 100, *l, 1))
                .collect();
            let entries = top_n(&videos, Metric::EngagementRate, n);

            prop_assert_eq!(entries.len(), n.min(videos.len()));
            for pair in entries.windows(2) {
                prop_assert!(pair[0].metric_value >= pair[1].metric_value);
                if pair[0].metric_value == pair[1].metric_value {
                    prop_assert!(pair[0].position < pair[1].position);
                }
            }
        }
    }
}
