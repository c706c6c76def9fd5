use anyhow::Context;

use invsight_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    invsight_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = invsight_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        policy = ?config.transfer_policy,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
