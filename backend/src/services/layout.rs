//! Vertical placement of the leaderboard blocks on the charts sheet.
//!
//! Each block is a table (header + one row per entry) starting at column 1
//! with a bar chart anchored beside it on the same top row. Charts render at a
//! fixed size that covers [`CHART_HEIGHT_ROWS`] rows, so a block is at least
//! that tall, and one blank row separates consecutive blocks.

use log::debug;
use serde::{Deserialize, Serialize};

pub const CHART_HEIGHT_ROWS: usize = 19;
pub const BLOCK_GAP_ROWS: usize = 1;
pub const DEFAULT_START_ROW: usize = 1;
pub const TABLE_COLUMN: usize = 1;
/// Charts sit four columns right of the table, leaving one blank column.
pub const CHART_COLUMN_OFFSET: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRequest {
    pub label: String,
    pub metric_name: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    pub label: String,
    pub metric_name: String,
    pub top_row: usize,
    pub table_column: usize,
    /// Header plus data rows.
    pub table_row_count: usize,
    pub chart_anchor_row: usize,
    pub chart_anchor_column: usize,
    pub chart_height_rows: usize,
}

impl LayoutBlock {
    pub fn total_height(&self) -> usize {
        self.table_row_count.max(self.chart_height_rows)
    }

    /// First data row of the table (the row after its header).
    pub fn first_data_row(&self) -> usize {
        self.top_row + 1
    }

    pub fn last_table_row(&self) -> usize {
        self.top_row + self.table_row_count - 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub blocks: Vec<LayoutBlock>,
    /// Row where a further block would start; equals the start row for an empty plan.
    pub final_row: usize,
}

pub fn plan_layout(blocks: &[BlockRequest], start_row: usize) -> LayoutPlan {
    let mut current_row = start_row;
    let mut planned = Vec::with_capacity(blocks.len());

    for request in blocks {
        let block = LayoutBlock {
            label: request.label.clone(),
            metric_name: request.metric_name.clone(),
            top_row: current_row,
            table_column: TABLE_COLUMN,
            table_row_count: request.entry_count + 1,
            chart_anchor_row: current_row,
            chart_anchor_column: TABLE_COLUMN + CHART_COLUMN_OFFSET,
            chart_height_rows: CHART_HEIGHT_ROWS,
        };
        debug!(
            "Block '{}' at rows {}..{} ({} table rows)",
            block.label,
            block.top_row,
            block.top_row + block.total_height() - 1,
            block.table_row_count
        );

        current_row = block.top_row + block.total_height() + BLOCK_GAP_ROWS;
        planned.push(block);
    }

    LayoutPlan {
        blocks: planned,
        final_row: current_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(label: &str, entry_count: usize) -> BlockRequest {
        BlockRequest {
            label: label.to_string(),
            metric_name: format!("{label} metric"),
            entry_count,
        }
    }

    #[test]
    fn three_leaderboards_are_twenty_rows_apart() {
        let plan = plan_layout(
            &[request("a", 5), request("b", 3), request("c", 0)],
            DEFAULT_START_ROW,
        );

        let tops: Vec<usize> = plan.blocks.iter().map(|b| b.top_row).collect();
        assert_eq!(tops, [1, 21, 41]);
        assert_eq!(plan.final_row, 61);

        let b = &plan.blocks[1];
        assert_eq!(b.table_row_count, 4);
        assert_eq!(b.chart_anchor_row, 21);
        assert_eq!(b.chart_anchor_column, 5);
        assert_eq!(b.chart_height_rows, CHART_HEIGHT_ROWS);
        assert_eq!(b.first_data_row(), 22);
        assert_eq!(b.last_table_row(), 24);
    }

    #[test]
    fn empty_plan_is_a_no_op() {
        let plan = plan_layout(&[], 7);
        assert!(plan.blocks.is_empty());
        assert_eq!(plan.final_row, 7);
    }

    #[test]
    fn honours_custom_start_row() {
        let plan = plan_layout(&[request("a", 5), request("b", 5)], 4);
        assert_eq!(plan.blocks[0].top_row, 4);
        assert_eq!(plan.blocks[1].top_row, 24);
    }

    #[test]
    fn tables_taller_than_the_chart_push_the_next_block_down() {
        let plan = plan_layout(&[request("long", 30), request("next", 5)], 1);
        assert_eq!(plan.blocks[0].total_height(), 31);
        assert_eq!(plan.blocks[1].top_row, 33);
    }

    proptest! {
        #[test]
        fn blocks_never_overlap(
            counts in prop::collection::vec(0usize..18, 0..10),
            start in 1usize..50,
        ) {
            let requests: Vec<BlockRequest> =
                counts.iter().map(|c| request("block", *c)).collect();
            let plan = plan_layout(&requests, start);

            prop_assert_eq!(plan.blocks.len(), counts.len());
            if let Some(first) = plan.blocks.first() {
                prop_assert_eq!(first.top_row, start);
            }
            for pair in plan.blocks.windows(2) {
                prop_assert_eq!(pair[1].top_row, pair[0].top_row + CHART_HEIGHT_ROWS + BLOCK_GAP_ROWS);
                prop_assert!(pair[1].top_row >= pair[0].top_row + pair[0].total_height() + 1);
            }
        }
    }
}
