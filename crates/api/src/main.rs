use anyhow::Context;

use kitshelf_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kitshelf_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = kitshelf_api::app::build_app(&config).await?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        persistent = config.use_persistent_stores,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
