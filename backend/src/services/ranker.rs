use crate::models::{RankedVideo, ScoredVideo};
use crate::services::options::SortKey;
use crate::utils::compare_desc_int;
use log::warn;

/// Result of ranking: the ordered videos plus the warning raised for an
/// unknown sort key, if any.
#[derive(Debug)]
pub struct Ranking {
    pub videos: Vec<RankedVideo>,
    pub warning: Option<String>,
}

impl Ranking {
    pub fn sort_applied(&self) -> bool {
        self.warning.is_none()
    }
}

/// Orders videos for the main table, highest value (or newest) first, and
/// assigns each its 1-based position. The sort is stable. An unknown key is
/// not fatal: it is logged and the input order is kept.
pub fn rank(mut videos: Vec<ScoredVideo>, sort_key: &SortKey) -> Ranking {
    let warning = match sort_key {
        SortKey::ViewCount => {
            videos.sort_by(|a, b| {
                compare_desc_int(a.video().view_count, b.video().view_count)
            });
            None
        }
        SortKey::LikeCount => {
            videos.sort_by(|a, b| {
                compare_desc_int(a.video().like_count, b.video().like_count)
            });
            None
        }
        SortKey::CommentCount => {
            videos.sort_by(|a, b| {
                compare_desc_int(a.video().comment_count, b.video().comment_count)
            });
            None
        }
        SortKey::PublishedAt => {
            videos.sort_by(|a, b| b.video().published_at.cmp(&a.video().published_at));
            None
        }
        SortKey::Unrecognized(raw) => {
            let message = format!("Unknown sort key '{raw}', keeping search order");
            warn!("{message}");
            Some(message)
        }
    };

    let videos = videos
        .into_iter()
        .enumerate()
        .map(|(index, scored)| RankedVideo {
            position: index + 1,
            scored,
        })
        .collect();

    Ranking { videos, warning }
}
