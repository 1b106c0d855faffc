mod app;
mod auth;
mod config;
mod crafts;
mod error;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let app_state = state::AppState::init().await?;
    let app = app::build_app(app_state.clone())?;

    let served = app::serve(app, &app_state.config).await;
    app_state.store.close().await;
    tracing::info!("craft store closed");
    served
}

const DEFAULT_LOG_FILTER: &str = "claycorner=debug,axum=info,tower_http=info";

/// `RUST_LOG` picks the filter; `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.with_target(false).json().init(),
        _ => builder.init(),
    }
}
