use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::matrix::KeyedMatrix;
use super::observation::Observation;
use super::season::Season;

/// Behavioral cluster identifier. Non-negative for valid segments.
pub type ClusterId = i32;

/// Sentinel the clustering stage assigns to users it could not place.
/// Valid only as an assignment value, never as a profile or matrix key.
pub const NOISE_CLUSTER: ClusterId = -1;

/// Seasons in which each species' observation frequency is near its
/// annual peak. Species absent from the table count as never in season.
///
/// Produced upstream by the seasonality pipeline (a species qualifies
/// for every season within 10 percentage points of its peak frequency).
#[derive(Debug, Clone, Default)]
pub struct SpeciesSeasonality {
    entries: HashMap<String, Vec<Season>>,
}

impl SpeciesSeasonality {
    pub fn new(entries: HashMap<String, Vec<Season>>) -> Self {
        Self { entries }
    }

    /// Whether the species is in season right now. Conservative: an
    /// unknown species is never in season.
    pub fn is_active(&self, species: &str, season: Season) -> bool {
        self.entries
            .get(species)
            .map(|seasons| seasons.contains(&season))
            .unwrap_or(false)
    }

    /// Whether the species has a seasonality entry at all.
    pub fn contains(&self, species: &str) -> bool {
        self.entries.contains_key(species)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display metadata for one species, resolved from observation records.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeciesInfo {
    pub scientific_name: String,
    pub common_name: String,
    pub image_url: Option<String>,
    pub sightings: usize,
}

/// Table sizes of a loaded snapshot, for logs and the reload response.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ArtifactCounts {
    pub observations: usize,
    pub users: usize,
    pub clusters: usize,
    pub species: usize,
}

/// One coherent, immutable set of precomputed artifacts.
///
/// Everything a `recommend` call touches lives here, so a request that
/// holds a snapshot can never observe a half-refreshed mix of tables.
/// Derived indexes (per-user seen sets, the global popularity ranking,
/// per-species display info) are computed once at construction.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    observations: Vec<Observation>,
    user_clusters: HashMap<String, ClusterId>,
    cluster_profiles: HashMap<ClusterId, Vec<String>>,
    seasonality: SpeciesSeasonality,
    cluster_species: KeyedMatrix<ClusterId, String>,
    cluster_similarity: KeyedMatrix<ClusterId, ClusterId>,

    seen_by_user: HashMap<String, HashSet<String>>,
    species_info: HashMap<String, SpeciesInfo>,
    popularity: Vec<String>,
}

impl ArtifactSet {
    pub fn new(
        observations: Vec<Observation>,
        user_clusters: HashMap<String, ClusterId>,
        cluster_profiles: HashMap<ClusterId, Vec<String>>,
        seasonality: SpeciesSeasonality,
        cluster_species: KeyedMatrix<ClusterId, String>,
        cluster_similarity: KeyedMatrix<ClusterId, ClusterId>,
    ) -> Self {
        let mut seen_by_user: HashMap<String, HashSet<String>> = HashMap::new();
        let mut species_info: HashMap<String, SpeciesInfo> = HashMap::new();

        for obs in &observations {
            seen_by_user
                .entry(obs.user_login.clone())
                .or_default()
                .insert(obs.scientific_name.clone());

            let info = species_info
                .entry(obs.scientific_name.clone())
                .or_insert_with(|| SpeciesInfo {
                    scientific_name: obs.scientific_name.clone(),
                    common_name: obs.common_name.clone(),
                    image_url: None,
                    sightings: 0,
                });
            info.sightings += 1;
            if info.image_url.is_none() {
                info.image_url = obs.image_url.clone();
            }
        }

        // Global popularity ranking: observation count descending,
        // scientific name ascending on equal counts.
        let mut popularity: Vec<String> = species_info.keys().cloned().collect();
        popularity.sort_by(|a, b| {
            let count_a = species_info[a].sightings;
            let count_b = species_info[b].sightings;
            count_b.cmp(&count_a).then_with(|| a.cmp(b))
        });

        Self {
            observations,
            user_clusters,
            cluster_profiles,
            seasonality,
            cluster_species,
            cluster_similarity,
            seen_by_user,
            species_info,
            popularity,
        }
    }

    /// Empty snapshot, mainly for tests and the trivially-degenerate
    /// serving case.
    pub fn empty() -> Self {
        Self::new(
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
            SpeciesSeasonality::default(),
            KeyedMatrix::from_rows(Vec::new(), Vec::new()).expect("empty matrix"),
            KeyedMatrix::from_rows(Vec::new(), Vec::new()).expect("empty matrix"),
        )
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Distinct species this user has observed; `None` when the user
    /// has no observations at all.
    pub fn seen_species(&self, user_login: &str) -> Option<&HashSet<String>> {
        self.seen_by_user.get(user_login)
    }

    /// Cluster assignment, including the noise sentinel; `None` when the
    /// clustering stage never saw the user.
    pub fn cluster_of(&self, user_login: &str) -> Option<ClusterId> {
        self.user_clusters.get(user_login).copied()
    }

    /// Ranked species profile of a cluster; `None` for clusters the
    /// profiling stage never produced output for.
    pub fn profile(&self, cluster: ClusterId) -> Option<&[String]> {
        self.cluster_profiles.get(&cluster).map(|p| p.as_slice())
    }

    pub fn seasonality(&self) -> &SpeciesSeasonality {
        &self.seasonality
    }

    /// Cluster × species relative-frequency table.
    pub fn cluster_species(&self) -> &KeyedMatrix<ClusterId, String> {
        &self.cluster_species
    }

    /// Cluster × cluster cosine similarity table.
    pub fn cluster_similarity(&self) -> &KeyedMatrix<ClusterId, ClusterId> {
        &self.cluster_similarity
    }

    /// All observed species, most popular first.
    pub fn popularity_ranking(&self) -> &[String] {
        &self.popularity
    }

    /// Display metadata for a species, when it has been observed.
    pub fn species_info(&self, species: &str) -> Option<&SpeciesInfo> {
        self.species_info.get(species)
    }

    pub fn counts(&self) -> ArtifactCounts {
        ArtifactCounts {
            observations: self.observations.len(),
            users: self.seen_by_user.len(),
            clusters: self.cluster_profiles.len(),
            species: self.species_info.len(),
        }
    }
}
