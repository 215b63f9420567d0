use anyhow::{Context, Result};
use newstype::{api, app_state::AppState, config::Config};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "newstype=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    // Local credentials live in .env.local; neither file is required.
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = Config::from_env()?;
    if config.google().is_none() {
        warn!("GOOGLE_API_KEY/GOOGLE_CSE_CX not set; google results will be unavailable");
    }
    if config.naver().is_none() {
        warn!("NAVER_CLIENT_ID/NAVER_CLIENT_SECRET not set; naver results will be unavailable");
    }

    let state = AppState::from_config(&config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
