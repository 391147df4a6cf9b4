use anyhow::Context;

use loangate_api::app::{build_app, services};
use loangate_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;

    loangate_observability::init(config.log_format);

    let provider = services::build_provider(&config).context("failed to build identity provider")?;
    let app = build_app(services::AppServices::new(provider));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
