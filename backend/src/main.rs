use yt_trend_report::{build_rocket, config};

#[rocket::launch]
async fn rocket() -> _ {
    config::load_environment();
    config::init_logger();

    let state = match config::create_app_state().await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to set up report service: {e:#}");
            std::process::exit(1);
        }
    };
    let cors = match config::create_cors() {
        Ok(cors) => cors,
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    };

    build_rocket(state).attach(cors)
}
