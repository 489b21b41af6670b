//! Request options as closed enums.
//!
//! Each option has a stable key used on the wire. Search order, duration and
//! region have no usable default, so an unknown key is a configuration error.
//! The time filter falls back to "all time" and the sort key keeps unknown
//! values around so the ranker can warn and leave the order untouched.

use crate::error::{ReportError, Result};
use crate::models::ReportRequest;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound the Data API accepts for `maxResults` on search.list.
pub const MAX_RESULTS_LIMIT: u32 = 50;
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Extraction condition: how the platform orders candidates before we rank them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOrder {
    Relevance,
    ViewCount,
    Date,
}

impl SearchOrder {
    pub fn key(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::ViewCount => "viewCount",
            SearchOrder::Date => "date",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "Relevance",
            SearchOrder::ViewCount => "View count",
            SearchOrder::Date => "Upload date",
        }
    }

    pub fn all_variants() -> Vec<Self> {
        vec![SearchOrder::Relevance, SearchOrder::ViewCount, SearchOrder::Date]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all_variants().into_iter().find(|v| v.key() == key.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationFilter {
    /// Under 4 minutes
    Short,
    /// 4 to 20 minutes
    Medium,
    /// 20 minutes and longer
    Long,
    Any,
}

impl DurationFilter {
    pub fn key(&self) -> &'static str {
        match self {
            DurationFilter::Short => "short",
            DurationFilter::Medium => "medium",
            DurationFilter::Long => "long",
            DurationFilter::Any => "any",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DurationFilter::Short => "Under 4 minutes",
            DurationFilter::Medium => "4 to 20 minutes",
            DurationFilter::Long => "20 minutes or more",
            DurationFilter::Any => "Any length",
        }
    }

    pub fn all_variants() -> Vec<Self> {
        vec![
            DurationFilter::Short,
            DurationFilter::Medium,
            DurationFilter::Long,
            DurationFilter::Any,
        ]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all_variants().into_iter().find(|v| v.key() == key.trim())
    }

    /// Value of the `videoDuration` search parameter, `None` when unfiltered.
    pub fn api_value(&self) -> Option<&'static str> {
        match self {
            DurationFilter::Any => None,
            other => Some(other.key()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionPreference {
    Japan,
    Worldwide,
}

impl RegionPreference {
    pub fn key(&self) -> &'static str {
        match self {
            RegionPreference::Japan => "japan",
            RegionPreference::Worldwide => "worldwide",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RegionPreference::Japan => "Japan",
            RegionPreference::Worldwide => "Worldwide",
        }
    }

    pub fn all_variants() -> Vec<Self> {
        vec![RegionPreference::Japan, RegionPreference::Worldwide]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all_variants().into_iter().find(|v| v.key() == key.trim())
    }

    pub fn region_code(&self) -> Option<&'static str> {
        match self {
            RegionPreference::Japan => Some("JP"),
            RegionPreference::Worldwide => None,
        }
    }

    /// Interface and relevance language preferred for this region.
    pub fn language(&self) -> Option<&'static str> {
        match self {
            RegionPreference::Japan => Some("ja"),
            RegionPreference::Worldwide => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFilter {
    Week,
    Month,
    Year,
    AllTime,
}

impl TimeFilter {
    pub fn key(&self) -> &'static str {
        match self {
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::AllTime => "all",
        }
    }

    /// Unknown or missing keys mean no date restriction.
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            Some("week") => TimeFilter::Week,
            Some("month") => TimeFilter::Month,
            Some("year") => TimeFilter::Year,
            _ => TimeFilter::AllTime,
        }
    }

    pub fn published_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeFilter::Week => Some(now - Duration::days(7)),
            TimeFilter::Month => now.checked_sub_months(Months::new(1)),
            TimeFilter::Year => now.checked_sub_months(Months::new(12)),
            TimeFilter::AllTime => None,
        }
    }
}

/// Primary order of the main results table. Always descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    ViewCount,
    LikeCount,
    CommentCount,
    PublishedAt,
    /// Kept verbatim; ranking by it leaves the input order unchanged.
    Unrecognized(String),
}

impl SortKey {
    pub fn key(&self) -> &str {
        match self {
            SortKey::ViewCount => "viewCount",
            SortKey::LikeCount => "likeCount",
            SortKey::CommentCount => "commentCount",
            SortKey::PublishedAt => "publishedAt",
            SortKey::Unrecognized(raw) => raw,
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "viewCount" => SortKey::ViewCount,
            "likeCount" => SortKey::LikeCount,
            "commentCount" => SortKey::CommentCount,
            "publishedAt" => SortKey::PublishedAt,
            other => SortKey::Unrecognized(other.to_string()),
        }
    }
}

/// Validated form of a [`ReportRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub keyword: String,
    pub order: SearchOrder,
    pub max_results: u32,
    pub time_filter: TimeFilter,
    pub sort_key: SortKey,
    pub duration: DurationFilter,
    pub region: RegionPreference,
}

impl ReportOptions {
    pub fn from_request(request: &ReportRequest) -> Result<Self> {
        let keyword = request.keyword.trim();
        if keyword.is_empty() {
            return Err(ReportError::Configuration(
                "a search keyword is required".to_string(),
            ));
        }

        let order = required(request.order.as_deref(), "order", SearchOrder::from_key)?;
        let duration = required(request.duration.as_deref(), "duration", DurationFilter::from_key)?;
        let region = required(request.region.as_deref(), "region", RegionPreference::from_key)?;

        let sort_key = match request.sort_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => SortKey::from_key(key),
            _ => {
                return Err(ReportError::Configuration(
                    "a sort key must be selected".to_string(),
                ))
            }
        };

        let max_results = parse_max_results(request.max_results.as_ref())?;

        Ok(ReportOptions {
            keyword: keyword.to_string(),
            order,
            max_results,
            time_filter: TimeFilter::from_key(request.time_filter.as_deref()),
            sort_key,
            duration,
            region,
        })
    }
}

fn required<T>(value: Option<&str>, field: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ReportError::Configuration(format!("{field} must be selected")));
    }
    parse(raw).ok_or_else(|| ReportError::Configuration(format!("unknown {field}: {raw}")))
}

/// Accepts a JSON number or a numeric string; null or absent means the default.
fn parse_max_results(value: Option<&Value>) -> Result<u32> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_MAX_RESULTS),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if (1..=i64::from(MAX_RESULTS_LIMIT)).contains(&n) => Ok(n as u32),
        _ => Err(ReportError::Configuration(format!(
            "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
            value.map(Value::to_string).unwrap_or_default()
        ))),
    }
}
