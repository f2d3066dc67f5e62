use std::sync::Arc;

use tokio::sync::RwLock;

use crate::artifacts::ArtifactSource;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ArtifactCounts, ArtifactSet};

/// Shared application state.
///
/// The artifact set is kept as an `Arc` behind the lock: a handler
/// clones the inner `Arc` once and works on that snapshot for the whole
/// request, so a concurrent reload can never hand it a half-swapped mix
/// of tables. Reload builds the new set completely before taking the
/// write lock.
#[derive(Clone)]
pub struct AppState {
    config: Config,
    source: Arc<dyn ArtifactSource>,
    artifacts: Arc<RwLock<Arc<ArtifactSet>>>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn ArtifactSource>, initial: ArtifactSet) -> Self {
        Self {
            config,
            source,
            artifacts: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Coherent, immutable view of the current artifacts.
    pub async fn snapshot(&self) -> Arc<ArtifactSet> {
        self.artifacts.read().await.clone()
    }

    /// Reloads artifacts from the source and swaps them in atomically.
    ///
    /// On failure the previous set stays in place untouched.
    pub async fn reload(&self) -> AppResult<ArtifactCounts> {
        let fresh = Arc::new(self.source.load().await?);
        let counts = fresh.counts();
        *self.artifacts.write().await = fresh;
        tracing::info!(
            observations = counts.observations,
            users = counts.users,
            clusters = counts.clusters,
            species = counts.species,
            "Artifact snapshot swapped"
        );
        Ok(counts)
    }
}
