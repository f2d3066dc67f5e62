//! Artifact loading collaborator.
//!
//! The clustering pipeline leaves its output as a directory of JSON
//! files; this module reads them into one coherent [`ArtifactSet`].
//! A missing file is fatal for the serving session; a malformed table
//! likewise. Recoverable oddities (noise rows in cluster tables,
//! over-long profiles) are repaired with a warning instead.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    ArtifactSet, ClusterId, KeyedMatrix, Observation, Season, SpeciesSeasonality, NOISE_CLUSTER,
};

pub const OBSERVATIONS_FILE: &str = "observations.json";
pub const USER_CLUSTERS_FILE: &str = "user_clusters.json";
pub const CLUSTER_PROFILES_FILE: &str = "cluster_profiles.json";
pub const SEASONALITY_FILE: &str = "species_seasonality.json";
pub const CLUSTER_SPECIES_FILE: &str = "cluster_species_matrix.json";
pub const CLUSTER_SIMILARITY_FILE: &str = "cluster_similarity.json";

/// Source of precomputed artifacts.
///
/// The engine only ever sees the loaded [`ArtifactSet`]; swapping the
/// source (directory of files, object store, test fixture) is invisible
/// to it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Loads a complete, validated artifact set.
    async fn load(&self) -> AppResult<ArtifactSet>;
}

/// Reads the artifact directory the clustering pipeline writes.
pub struct FileArtifactSource {
    dir: PathBuf,
    profile_size: usize,
}

// On-disk shapes. One struct per file, named after the pipeline's
// output tables.

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    cluster: ClusterId,
    species: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonalityEntry {
    scientific_name: String,
    seasons: Vec<Season>,
}

#[derive(Debug, Deserialize)]
struct ClusterSpeciesFile {
    species: Vec<String>,
    rows: Vec<FrequencyRow>,
}

#[derive(Debug, Deserialize)]
struct FrequencyRow {
    cluster: ClusterId,
    frequencies: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ClusterSimilarityFile {
    clusters: Vec<ClusterId>,
    rows: Vec<SimilarityRow>,
}

#[derive(Debug, Deserialize)]
struct SimilarityRow {
    cluster: ClusterId,
    similarities: Vec<f64>,
}

impl FileArtifactSource {
    pub fn new(dir: impl Into<PathBuf>, profile_size: usize) -> Self {
        Self {
            dir: dir.into(),
            profile_size,
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> AppResult<T> {
        let bytes = read_file(&self.dir.join(name), name).await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::malformed(name, e.to_string()))
    }

    async fn load_profiles(&self) -> AppResult<HashMap<ClusterId, Vec<String>>> {
        let entries: Vec<ProfileEntry> = self.read_json(CLUSTER_PROFILES_FILE).await?;
        let mut profiles = HashMap::with_capacity(entries.len());

        for entry in entries {
            if entry.cluster == NOISE_CLUSTER {
                warn!("Dropping noise-cluster row from {}", CLUSTER_PROFILES_FILE);
                continue;
            }
            let mut species = entry.species;
            if species.len() > self.profile_size {
                warn!(
                    cluster = entry.cluster,
                    len = species.len(),
                    max = self.profile_size,
                    "Truncating over-long cluster profile"
                );
                species.truncate(self.profile_size);
            }
            if profiles.insert(entry.cluster, species).is_some() {
                return Err(AppError::malformed(
                    CLUSTER_PROFILES_FILE,
                    format!("duplicate cluster {}", entry.cluster),
                ));
            }
        }

        Ok(profiles)
    }

    async fn load_seasonality(&self) -> AppResult<SpeciesSeasonality> {
        let entries: Vec<SeasonalityEntry> = self.read_json(SEASONALITY_FILE).await?;
        Ok(SpeciesSeasonality::new(
            entries
                .into_iter()
                .map(|e| (e.scientific_name, e.seasons))
                .collect(),
        ))
    }

    async fn load_cluster_species(&self) -> AppResult<KeyedMatrix<ClusterId, String>> {
        let file: ClusterSpeciesFile = self.read_json(CLUSTER_SPECIES_FILE).await?;
        let rows = drop_noise_rows(
            file.rows
                .into_iter()
                .map(|r| (r.cluster, r.frequencies))
                .collect(),
            CLUSTER_SPECIES_FILE,
        );
        KeyedMatrix::from_rows(file.species, rows)
            .map_err(|e| AppError::malformed(CLUSTER_SPECIES_FILE, e))
    }

    async fn load_cluster_similarity(&self) -> AppResult<KeyedMatrix<ClusterId, ClusterId>> {
        let file: ClusterSimilarityFile = self.read_json(CLUSTER_SIMILARITY_FILE).await?;
        if file.clusters.contains(&NOISE_CLUSTER) {
            return Err(AppError::malformed(
                CLUSTER_SIMILARITY_FILE,
                "noise cluster among similarity columns",
            ));
        }
        let rows = drop_noise_rows(
            file.rows
                .into_iter()
                .map(|r| (r.cluster, r.similarities))
                .collect(),
            CLUSTER_SIMILARITY_FILE,
        );
        KeyedMatrix::from_rows(file.clusters, rows)
            .map_err(|e| AppError::malformed(CLUSTER_SIMILARITY_FILE, e))
    }
}

#[async_trait::async_trait]
impl ArtifactSource for FileArtifactSource {
    async fn load(&self) -> AppResult<ArtifactSet> {
        let observations: Vec<Observation> = self.read_json(OBSERVATIONS_FILE).await?;
        let user_clusters: HashMap<String, ClusterId> =
            self.read_json(USER_CLUSTERS_FILE).await?;
        let profiles = self.load_profiles().await?;
        let seasonality = self.load_seasonality().await?;
        let cluster_species = self.load_cluster_species().await?;
        let cluster_similarity = self.load_cluster_similarity().await?;

        let set = ArtifactSet::new(
            observations,
            user_clusters,
            profiles,
            seasonality,
            cluster_species,
            cluster_similarity,
        );

        let counts = set.counts();
        info!(
            observations = counts.observations,
            users = counts.users,
            clusters = counts.clusters,
            species = counts.species,
            seasonality_entries = set.seasonality().len(),
            "Artifacts loaded"
        );

        Ok(set)
    }
}

async fn read_file(path: &Path, name: &str) -> AppResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AppError::MissingArtifact(name.to_string())
        } else {
            AppError::Io(e)
        }
    })
}

/// The clustering stage keeps a −1 row for unassigned users in some of
/// its exports; the engine never indexes by it, so it is dropped here.
fn drop_noise_rows(
    rows: Vec<(ClusterId, Vec<f64>)>,
    file: &str,
) -> Vec<(ClusterId, Vec<f64>)> {
    let before = rows.len();
    let rows: Vec<_> = rows
        .into_iter()
        .filter(|(cluster, _)| *cluster != NOISE_CLUSTER)
        .collect();
    if rows.len() < before {
        warn!("Dropping noise-cluster row from {}", file);
    }
    rows
}
