mod common;

use chrono::Utc;
use common::{example_platform, request, FakePlatform};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::Value;
use std::sync::Arc;
use yt_trend_report::services::report_service::ReportService;
use yt_trend_report::services::surface::MemorySurface;
use yt_trend_report::{build_rocket, AppState};

async fn client(platform: FakePlatform) -> Client {
    let platform = Arc::new(platform);
    let state = AppState {
        report_service: ReportService::new(
            platform.clone(),
            platform,
            Arc::new(MemorySurface::new()),
        ),
    };
    Client::tracked(build_rocket(state))
        .await
        .expect("valid rocket instance")
}

#[rocket::async_test]
async fn post_report_returns_summary_and_fills_sheets() {
    let client = client(example_platform(Utc::now())).await;

    let response = client
        .post("/api/report")
        .json(&request("test", "viewCount"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["video_count"], 3);
    assert_eq!(body["leaderboards"].as_array().unwrap().len(), 3);
    assert_eq!(body["layout"]["blocks"][1]["top_row"], 21);

    let response = client.get("/api/report/charts").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let sheet: Value = response.into_json().await.unwrap();
    assert_eq!(sheet["charts"].as_array().unwrap().len(), 3);
}

#[rocket::async_test]
async fn configuration_error_is_bad_request() {
    let client = client(example_platform(Utc::now())).await;
    let mut bad = request("test", "viewCount");
    bad.order = None;

    let response = client
        .post("/api/report")
        .header(ContentType::JSON)
        .body(serde_json::to_string(&bad).unwrap())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "configuration");
}

#[rocket::async_test]
async fn body_without_keyword_is_configuration_error() {
    let client = client(example_platform(Utc::now())).await;
    let response = client
        .post("/api/report")
        .header(ContentType::JSON)
        .body(r#"{"order":"relevance","sort_key":"viewCount","duration":"any","region":"worldwide"}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(response.content_type(), Some(ContentType::JSON));
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "configuration");
    assert!(body["message"].as_str().unwrap().contains("keyword"));
}

#[rocket::async_test]
async fn string_or_negative_max_results_is_configuration_error() {
    let client = client(example_platform(Utc::now())).await;
    for max_results in [r#""many""#, "-5"] {
        let body = format!(
            r#"{{"keyword":"test","order":"relevance","sort_key":"viewCount","duration":"any","region":"worldwide","max_results":{max_results}}}"#
        );
        let response = client
            .post("/api/report")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "configuration");
        assert!(body["message"].as_str().unwrap().contains("max_results"));
    }
}

#[rocket::async_test]
async fn wrongly_typed_or_broken_body_is_json_bad_request() {
    let client = client(example_platform(Utc::now())).await;
    for body in [r#"{"keyword":"test","order":7}"#, "{not json"] {
        let response = client
            .post("/api/report")
            .header(ContentType::JSON)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(response.content_type(), Some(ContentType::JSON));
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error"], "configuration");
    }
}

#[rocket::async_test]
async fn empty_result_is_not_found() {
    let client = client(FakePlatform::default()).await;
    let response = client
        .post("/api/report")
        .json(&request("nothing", "viewCount"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "empty_result");
}

#[rocket::async_test]
async fn search_failure_is_bad_gateway() {
    let mut platform = example_platform(Utc::now());
    platform.fail_search = true;
    let client = client(platform).await;

    let response = client
        .post("/api/report")
        .json(&request("test", "viewCount"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadGateway);
    let body: Value = response.into_json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("quota exceeded"));
}

#[rocket::async_test]
async fn unknown_sheet_is_not_found() {
    let client = client(FakePlatform::default()).await;
    let response = client.get("/api/report/secrets").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}
