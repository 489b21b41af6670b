pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use rocket::{catchers, routes, Build, Rocket};
use services::report_service::ReportService;

pub struct AppState {
    pub report_service: ReportService,
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/api/report", routes![api::create_report, api::get_sheet])
        .register(
            "/api/report",
            catchers![api::malformed_request, api::unprocessable_request],
        )
}
