//! Report surface persisted in Elasticsearch: one document per cell and one per chart.

use crate::services::surface::{
    next_chart_id, Cell, CellValue, Chart, ChartSpec, ReportSurface, SheetSnapshot,
};
use anyhow::{anyhow, Context, Result};
use elasticsearch::http::request::JsonBody;
use elasticsearch::http::response::Response;
use elasticsearch::params::Refresh;
use elasticsearch::{
    indices::IndicesCreateParts, BulkParts, DeleteByQueryParts, DeleteParts, Elasticsearch,
    IndexParts, SearchParts,
};
use log::{error, info};
use serde_json::{json, Value};

pub const CELLS_INDEX: &str = "report_cells";
pub const CHARTS_INDEX: &str = "report_charts";
const MAX_SHEET_DOCS: usize = 10_000;

pub struct ElasticsearchSurface {
    es_client: Elasticsearch,
}

impl ElasticsearchSurface {
    pub fn new(es_client: Elasticsearch) -> Self {
        ElasticsearchSurface { es_client }
    }

    pub async fn create_indices(&self) {
        create_es_index(&self.es_client, CELLS_INDEX, cells_mapping()).await;
        create_es_index(&self.es_client, CHARTS_INDEX, charts_mapping()).await;
    }

    async fn search_sheet(&self, index: &str, sheet: &str, sort: Value) -> Result<Vec<Value>> {
        let response = self
            .es_client
            .search(SearchParts::Index(&[index]))
            .body(json!({
                "size": MAX_SHEET_DOCS,
                "query": { "term": { "sheet": sheet } },
                "sort": sort
            }))
            .send()
            .await
            .with_context(|| format!("Elasticsearch search on {index} failed"))?;
        let body = ensure_success(response, index).await?;

        Ok(body["hits"]["hits"]
            .as_array()
            .map(|hits| hits.iter().map(|hit| hit["_source"].clone()).collect())
            .unwrap_or_default())
    }

    async fn load_charts(&self, sheet: &str) -> Result<Vec<Chart>> {
        let sources = self
            .search_sheet(CHARTS_INDEX, sheet, json!([{ "seq": { "order": "asc" } }]))
            .await?;

        sources
            .into_iter()
            .map(|source| -> Result<Chart> {
                let id = source["chart_id"]
                    .as_str()
                    .ok_or_else(|| anyhow!("Chart document without chart_id"))?
                    .to_string();
                let spec: ChartSpec = serde_json::from_value(source["spec"].clone())
                    .context("Malformed chart spec")?;
                Ok(Chart { id, spec })
            })
            .collect()
    }
}

fn cell_doc_id(sheet: &str, row: usize, column: usize) -> String {
    format!("{sheet}:{row}:{column}")
}

fn chart_doc_id(sheet: &str, chart_id: &str) -> String {
    format!("{sheet}:{chart_id}")
}

fn chart_seq(chart_id: &str) -> usize {
    chart_id
        .strip_prefix("chart-")
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn cells_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "sheet": { "type": "keyword" },
                "row": { "type": "integer" },
                "column": { "type": "integer" },
                "value": { "type": "object", "enabled": false }
            }
        }
    })
}

fn charts_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "sheet": { "type": "keyword" },
                "chart_id": { "type": "keyword" },
                "seq": { "type": "integer" },
                "spec": { "type": "object", "enabled": false }
            }
        }
    })
}

async fn ensure_success(response: Response, what: &str) -> Result<Value> {
    let status = response.status_code();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Elasticsearch {what} failed with status {status}: {text}"));
    }
    response
        .json::<Value>()
        .await
        .with_context(|| format!("Failed to parse Elasticsearch {what} response"))
}

async fn create_es_index(es_client: &Elasticsearch, index: &str, body: Value) {
    match es_client
        .indices()
        .create(IndicesCreateParts::Index(index))
        .body(body)
        .send()
        .await
    {
        Ok(response) => {
            if response.status_code().is_success() {
                info!("Elasticsearch index '{index}' created.");
            } else {
                let response_text = response.text().await.unwrap_or_default();
                if response_text.contains("resource_already_exists_exception") {
                    info!("Elasticsearch index '{index}' already exists.");
                } else {
                    error!("Failed to create Elasticsearch index {index}: {response_text}");
                }
            }
        }
        Err(e) => {
            error!("Failed to connect to Elasticsearch to create index {index}: {e:?}");
        }
    }
}

#[rocket::async_trait]
impl ReportSurface for ElasticsearchSurface {
    async fn clear_sheet(&self, sheet: &str) -> Result<()> {
        let response = self
            .es_client
            .delete_by_query(DeleteByQueryParts::Index(&[CELLS_INDEX]))
            .body(json!({ "query": { "term": { "sheet": sheet } } }))
            .refresh(true)
            .send()
            .await
            .context("Elasticsearch delete_by_query failed")?;
        ensure_success(response, "clear sheet").await?;
        Ok(())
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

        let mut body: Vec<JsonBody<Value>> = Vec::new();
        for (r, row_values) in values.into_iter().enumerate() {
            for (c, value) in row_values.into_iter().enumerate() {
                let (cell_row, cell_column) = (row + r, column + c);
                body.push(JsonBody::new(json!({
                    "index": { "_id": cell_doc_id(sheet, cell_row, cell_column) }
                })));
                body.push(JsonBody::new(json!({
                    "sheet": sheet,
                    "row": cell_row,
                    "column": cell_column,
                    "value": value
                })));
            }
        }
        if body.is_empty() {
            return Ok(());
        }

        let response = self
            .es_client
            .bulk(BulkParts::Index(CELLS_INDEX))
            .body(body)
            .refresh(Refresh::WaitFor)
            .send()
            .await
            .context("Elasticsearch bulk write failed")?;
        let result = ensure_success(response, "bulk write").await?;
        if result["errors"].as_bool().unwrap_or(false) {
            return Err(anyhow!("Elasticsearch rejected some cells of sheet {sheet}"));
        }
        Ok(())
    }

    async fn list_charts(&self, sheet: &str) -> Result<Vec<String>> {
        Ok(self
            .load_charts(sheet)
            .await?
            .into_iter()
            .map(|chart| chart.id)
            .collect())
    }

    async fn remove_chart(&self, sheet: &str, chart_id: &str) -> Result<()> {
        let response = self
            .es_client
            .delete(DeleteParts::IndexId(CHARTS_INDEX, &chart_doc_id(sheet, chart_id)))
            .refresh(Refresh::WaitFor)
            .send()
            .await
            .context("Elasticsearch chart delete failed")?;
        ensure_success(response, "chart delete").await?;
        Ok(())
    }

    async fn insert_bar_chart(&self, sheet: &str, spec: ChartSpec) -> Result<String> {
        let existing = self.list_charts(sheet).await?;
        let chart_id = next_chart_id(existing.iter().map(String::as_str));

        let response = self
            .es_client
            .index(IndexParts::IndexId(
                CHARTS_INDEX,
                &chart_doc_id(sheet, &chart_id),
            ))
            .body(json!({
                "sheet": sheet,
                "chart_id": chart_id,
                "seq": chart_seq(&chart_id),
                "spec": spec
            }))
            .refresh(Refresh::WaitFor)
            .send()
            .await
            .context("Elasticsearch chart insert failed")?;
        ensure_success(response, "chart insert").await?;
        Ok(chart_id)
    }

    async fn snapshot(&self, sheet: &str) -> Result<SheetSnapshot> {
        let sources = self
            .search_sheet(
                CELLS_INDEX,
                sheet,
                json!([{ "row": { "order": "asc" } }, { "column": { "order": "asc" } }]),
            )
            .await?;

        let cells = sources
            .into_iter()
            .map(|source| serde_json::from_value::<Cell>(source).context("Malformed cell document"))
            .collect::<Result<Vec<_>>>()?;

        Ok(SheetSnapshot {
            sheet: sheet.to_string(),
            cells,
            charts: self.load_charts(sheet).await?,
        })
    }
}
