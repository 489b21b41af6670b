pub mod elasticsearch_service;
pub mod layout;
pub mod leaderboard;
pub mod metrics;
pub mod options;
pub mod platform;
pub mod ranker;
pub mod renderer;
pub mod report_service;
pub mod surface;
pub mod youtube;
