//! Writes a finished report onto a [`ReportSurface`].
//!
//! Every chart on the charts sheet is removed and both sheets are cleared
//! before anything is drawn, so rendering the same report twice leaves the
//! surface in the same state.

use crate::models::RankedVideo;
use crate::services::layout::{LayoutBlock, LayoutPlan};
use crate::services::leaderboard::Leaderboard;
use crate::services::surface::{CellRange, CellValue, ChartSpec, ReportSurface};
use anyhow::{Context, Result};
use log::{debug, info};

pub const RESULTS_SHEET: &str = "search_results";
pub const CHARTS_SHEET: &str = "charts";

pub const RESULTS_HEADERS: [&str; 9] = [
    "No.",
    "Title",
    "URL",
    "Published",
    "Channel",
    "Description",
    "Engagement rate",
    "Trending rate",
    "Views / subscribers",
];

/// Title and value columns of a leaderboard table, relative to its first column.
const CHART_DATA_COLUMN_OFFSET: usize = 1;
const CHART_DATA_COLUMNS: usize = 2;

pub struct ReportRenderer<'a> {
    surface: &'a dyn ReportSurface,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(surface: &'a dyn ReportSurface) -> Self {
        ReportRenderer { surface }
    }

    /// Removes every chart and clears both sheets, then draws the report.
    ///
    /// Nothing is written until the reset has succeeded, so a failing
    /// surface never mixes a new results sheet with old charts. A failure
    /// while drawing can still leave the sheets partly written; the next
    /// successful render replaces them entirely.
    pub async fn render(
        &self,
        videos: &[RankedVideo],
        leaderboards: &[Leaderboard],
        layout: &LayoutPlan,
    ) -> Result<()> {
        self.reset().await.context("Failed to clear the report sheets")?;
        self.render_results(videos)
            .await
            .context("Failed to write results sheet")?;
        for (block, board) in layout.blocks.iter().zip(leaderboards) {
            self.render_block(block, board)
                .await
                .context("Failed to write charts sheet")?;
        }
        info!(
            "Rendered {} videos and {} leaderboards",
            videos.len(),
            leaderboards.len()
        );
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        for chart_id in self.surface.list_charts(CHARTS_SHEET).await? {
            self.surface.remove_chart(CHARTS_SHEET, &chart_id).await?;
        }
        self.surface.clear_sheet(CHARTS_SHEET).await?;
        self.surface.clear_sheet(RESULTS_SHEET).await
    }

    async fn render_results(&self, videos: &[RankedVideo]) -> Result<()> {
        let header: Vec<CellValue> = RESULTS_HEADERS
            .iter()
            .map(|header| CellValue::text(header))
            .collect();
        self.surface
            .write_values(RESULTS_SHEET, 1, 1, vec![header])
            .await?;

        if videos.is_empty() {
            return Ok(());
        }
        let rows = videos.iter().map(results_row).collect();
        self.surface.write_values(RESULTS_SHEET, 2, 1, rows).await
    }

    async fn render_block(&self, block: &LayoutBlock, board: &Leaderboard) -> Result<()> {
        let header = vec![
            CellValue::text("No."),
            CellValue::text("Title"),
            CellValue::text(&block.metric_name),
        ];
        self.surface
            .write_values(CHARTS_SHEET, block.top_row, block.table_column, vec![header])
            .await?;

        if board.entries.is_empty() {
            debug!("Leaderboard '{}' is empty, no chart drawn", block.label);
            return Ok(());
        }

        let rows: Vec<Vec<CellValue>> = board
            .entries
            .iter()
            .map(|entry| {
                vec![
                    CellValue::Link {
                        label: entry.position.to_string(),
                        sheet: RESULTS_SHEET.to_string(),
                        // header occupies row 1 of the results sheet
                        row: entry.position + 1,
                    },
                    CellValue::Text(entry.title.clone()),
                    CellValue::Number(entry.metric_value),
                ]
            })
            .collect();
        self.surface
            .write_values(
                CHARTS_SHEET,
                block.first_data_row(),
                block.table_column,
                rows,
            )
            .await?;

        let spec = ChartSpec {
            title: block.label.clone(),
            h_axis_title: block.metric_name.clone(),
            anchor_row: block.chart_anchor_row,
            anchor_column: block.chart_anchor_column,
            data_range: CellRange {
                first_row: block.first_data_row(),
                first_column: block.table_column + CHART_DATA_COLUMN_OFFSET,
                row_count: board.entries.len(),
                column_count: CHART_DATA_COLUMNS,
            },
            legend_visible: false,
        };
        let chart_id = self.surface.insert_bar_chart(CHARTS_SHEET, spec).await?;
        debug!("Inserted chart {chart_id} for '{}'", block.label);
        Ok(())
    }
}

fn results_row(ranked: &RankedVideo) -> Vec<CellValue> {
    let video = ranked.scored.video();
    let metrics = ranked.scored.metrics();
    vec![
        CellValue::Integer(ranked.position as i64),
        CellValue::Text(video.title.clone()),
        CellValue::Text(video.url.clone()),
        CellValue::Timestamp(video.published_at),
        CellValue::Text(video.channel_title.clone()),
        CellValue::Text(video.description.clone()),
        CellValue::Number(metrics.engagement_rate),
        CellValue::Number(metrics.trending_rate),
        CellValue::Number(metrics.view_sub_ratio),
    ]
}
