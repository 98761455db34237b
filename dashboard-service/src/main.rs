use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use dashboard_service::{config::AppConfig, http, observability, DashboardState};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let cfg = AppConfig::load()?;

    if let Some(metrics_cfg) = &cfg.metrics {
        http::metrics::init(&metrics_cfg.bind_addr)?;
    }

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;

    let state = Arc::new(DashboardState::from_config(&cfg));
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        table = %cfg.data.table_path,
        forecast = cfg.data.forecast_path.as_deref().unwrap_or("-"),
        "dashboard listening"
    );
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
