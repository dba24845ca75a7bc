use std::sync::Arc;

use anyhow::Context;

use stocktake_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stocktake_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(app::services::build_services(&config));
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
