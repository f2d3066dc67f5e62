use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use birdedex_api::api::{create_router, AppState};
use birdedex_api::artifacts::{ArtifactSource, FileArtifactSource};
use birdedex_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // A serving session without artifacts is useless; abort before
    // binding rather than serve errors.
    let source = Arc::new(FileArtifactSource::new(
        &config.artifacts_dir,
        config.profile_size,
    ));
    let initial = source.load().await?;

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, source, initial);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
