use crate::error::ReportError;
use crate::models::{ErrorResponse, ReportRequest, ReportSummary};
use crate::services::renderer::{CHARTS_SHEET, RESULTS_SHEET};
use crate::services::surface::SheetSnapshot;
use crate::AppState;
use log::info;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, get, post, Request, State};

#[post("/", data = "<request>")]
pub async fn create_report(
    request: Json<ReportRequest>,
    state: &State<AppState>,
) -> Result<Json<ReportSummary>, ErrorResponse> {
    match state
        .report_service
        .run(&request, chrono::Utc::now())
        .await
    {
        Ok(summary) => {
            info!(
                "Report for '{}' written with {} videos",
                summary.keyword, summary.video_count
            );
            Ok(Json(summary))
        }
        Err(e) => Err(ErrorResponse::from(&e)),
    }
}

#[get("/<sheet>")]
pub async fn get_sheet(
    sheet: &str,
    state: &State<AppState>,
) -> Result<Json<SheetSnapshot>, ErrorResponse> {
    if sheet != RESULTS_SHEET && sheet != CHARTS_SHEET {
        return Err(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("Unknown sheet: {sheet}"),
            status: Status::NotFound,
        });
    }

    state
        .report_service
        .surface()
        .snapshot(sheet)
        .await
        .map(Json)
        .map_err(|e| {
            log::error!("Failed to read sheet {sheet}: {e:#}");
            ErrorResponse::from(&ReportError::external("Reading the report surface", e))
        })
}

/// Bodies that are not JSON, or whose fields have the wrong JSON type, never
/// reach the handler. They are answered like any other bad option.
#[catch(400)]
pub fn malformed_request(req: &Request) -> ErrorResponse {
    rejected_body(req)
}

#[catch(422)]
pub fn unprocessable_request(req: &Request) -> ErrorResponse {
    rejected_body(req)
}

fn rejected_body(req: &Request) -> ErrorResponse {
    info!("Rejected request body for {}", req.uri());
    ErrorResponse::from(&ReportError::Configuration(
        "the request body is not a valid report request".to_string(),
    ))
}
