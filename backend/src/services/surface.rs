//! The sheet-like surface a report is rendered onto.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Timestamp(DateTime<Utc>),
    /// A label that jumps to `row` of another sheet.
    Link {
        label: String,
        sheet: String,
        row: usize,
    },
}

impl CellValue {
    pub fn text(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub value: CellValue,
}

/// 1-based rectangular range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub first_row: usize,
    pub first_column: usize,
    pub row_count: usize,
    pub column_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub h_axis_title: String,
    pub anchor_row: usize,
    pub anchor_column: usize,
    pub data_range: CellRange,
    pub legend_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: String,
    pub spec: ChartSpec,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetSnapshot {
    pub sheet: String,
    /// Ordered by row, then column.
    pub cells: Vec<Cell>,
    pub charts: Vec<Chart>,
}

#[rocket::async_trait]
pub trait ReportSurface: Send + Sync {
    /// Removes every cell of the sheet, creating the sheet if needed. Charts stay.
    async fn clear_sheet(&self, sheet: &str) -> Result<()>;

    /// Writes `values` as a block whose top-left cell is (`row`, `column`).
    async fn write_values(
        &self,
        sheet: &str,
        row: usize,
        column: usize,
        values: Vec<Vec<CellValue>>,
    ) -> Result<()>;

    async fn list_charts(&self, sheet: &str) -> Result<Vec<String>>;

    async fn remove_chart(&self, sheet: &str, chart_id: &str) -> Result<()>;

    /// Inserts a bar chart and returns its id.
    async fn insert_bar_chart(&self, sheet: &str, spec: ChartSpec) -> Result<String>;

    async fn snapshot(&self, sheet: &str) -> Result<SheetSnapshot>;
}

/// Chart ids are `chart-<n>`, numbered per sheet from the highest id in use.
pub fn next_chart_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let highest = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix("chart-")?.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    format!("chart-{}", highest + 1)
}

#[derive(Debug, Default)]
struct SheetState {
    cells: BTreeMap<(usize, usize), CellValue>,
    charts: Vec<Chart>,
}

/// Surface kept in process memory. Used when no external store is configured.
#[derive(Debug, Default)]
pub struct MemorySurface {
    sheets: Mutex<HashMap<String, SheetState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_sheet<T>(&self, sheet: &str, f: impl FnOnce(&mut SheetState) -> T) -> Result<T> {
        let mut sheets = self
            .sheets
            .lock()
            .map_err(|_| anyhow!("Report surface lock poisoned"))?;
        Ok(f(sheets.entry(sheet.to_string()).or_default()))
    }
}

#[rocket::async_trait]
impl ReportSurface for MemorySurface {
    async fn clear_sheet(&self, sheet: &str) -> Result<()> {
        self.with_sheet(sheet, |state| state.cells.clear())
    }

    async fn write_values(
        &self,
        sheet: &str,
        row: usize,
        column: usize,
        values: Vec<Vec<CellValue>>,
    ) -> Result<()> {
        if row == 0 || column == 0 {
            return Err(anyhow!("Cell coordinates are 1-based, got ({row}, {column})"));
        }
        self.with_sheet(sheet, |state| {
            for (r, row_values) in values.into_iter().enumerate() {
                for (c, value) in row_values.into_iter().enumerate() {
                    state.cells.insert((row + r, column + c), value);
                }
            }
        })
    }

    async fn list_charts(&self, sheet: &str) -> Result<Vec<String>> {
        self.with_sheet(sheet, |state| {
            state.charts.iter().map(|chart| chart.id.clone()).collect()
        })
    }

    async fn remove_chart(&self, sheet: &str, chart_id: &str) -> Result<()> {
        let removed = self.with_sheet(sheet, |state| {
            let before = state.charts.len();
            state.charts.retain(|chart| chart.id != chart_id);
            before != state.charts.len()
        })?;
        if removed {
            Ok(())
        } else {
            Err(anyhow!("Chart {chart_id} not found on sheet {sheet}"))
        }
    }

    async fn insert_bar_chart(&self, sheet: &str, spec: ChartSpec) -> Result<String> {
        self.with_sheet(sheet, |state| {
            let id = next_chart_id(state.charts.iter().map(|chart| chart.id.as_str()));
            state.charts.push(Chart {
                id: id.clone(),
                spec,
            });
            id
        })
    }

    async fn snapshot(&self, sheet: &str) -> Result<SheetSnapshot> {
        let sheets = self
            .sheets
            .lock()
            .map_err(|_| anyhow!("Report surface lock poisoned"))?;

        Ok(match sheets.get(sheet) {
            Some(state) => SheetSnapshot {
                sheet: sheet.to_string(),
                cells: state
                    .cells
                    .iter()
                    .map(|(&(row, column), value)| Cell {
                        row,
                        column,
                        value: value.clone(),
                    })
                    .collect(),
                charts: state.charts.clone(),
            },
            None => SheetSnapshot {
                sheet: sheet.to_string(),
                ..SheetSnapshot::default()
            },
        })
    }
}
