use crate::services::elasticsearch_service::ElasticsearchSurface;
use crate::services::report_service::ReportService;
use crate::services::surface::{MemorySurface, ReportSurface};
use crate::services::youtube::YouTubeClient;
use crate::AppState;
use anyhow::Result;
use elasticsearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    Elasticsearch,
};
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;

lazy_static! {
    pub static ref YOUTUBE_API_KEY: String = env::var("YOUTUBE_API_KEY").unwrap_or_default();
    pub static ref YOUTUBE_API_BASE_URL: String = env::var("YOUTUBE_API_BASE_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string());
    pub static ref REPORT_SURFACE: String =
        env::var("REPORT_SURFACE").unwrap_or_else(|_| "memory".to_string());
    pub static ref ELASTICSEARCH_URL: String =
        env::var("ELASTICSEARCH_URL").unwrap_or_else(|_| "http://localhost:9200".to_string());
    pub static ref ALLOWED_ORIGIN: String =
        env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting trend report backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_elasticsearch_client() -> Result<Elasticsearch> {
    let es_url = &*ELASTICSEARCH_URL;
    info!("Connecting to Elasticsearch at: {es_url}");

    let transport =
        TransportBuilder::new(SingleNodeConnectionPool::new(es_url.parse()?)).build()?;

    Ok(Elasticsearch::new(transport))
}

pub async fn create_surface() -> Result<Arc<dyn ReportSurface>> {
    match REPORT_SURFACE.trim() {
        "memory" => {
            info!("Rendering reports into process memory.");
            Ok(Arc::new(MemorySurface::new()))
        }
        "elasticsearch" => {
            let surface = ElasticsearchSurface::new(create_elasticsearch_client()?);
            surface.create_indices().await;
            Ok(Arc::new(surface))
        }
        other => Err(anyhow::anyhow!(
            "REPORT_SURFACE must be 'memory' or 'elasticsearch', got '{other}'"
        )),
    }
}

pub async fn create_app_state() -> Result<AppState> {
    let youtube = Arc::new(YouTubeClient::new(
        &YOUTUBE_API_KEY,
        &YOUTUBE_API_BASE_URL,
    )?);
    let surface = create_surface().await?;

    Ok(AppState {
        report_service: ReportService::new(youtube.clone(), youtube, surface),
    })
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[ALLOWED_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .allow_credentials(false)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
