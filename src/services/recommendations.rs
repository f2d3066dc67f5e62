use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};

use crate::models::{
    ArtifactSet, ClusterId, Recommendation, Season, Segment, SpeciesSeasonality,
};
use crate::services::segments;

/// Greeting for observers with no sightings on record.
pub const MSG_NEW_USER: &str =
    "Welcome! Looks like you are a new Master. Here are the most popular birds of São Paulo:";

/// Greeting for noise-segment observers who have not seen anything yet.
pub const MSG_POPULAR: &str = "Welcome! Here are the most popular birds of São Paulo:";

/// Rationale for the content-similarity strategy.
pub const MSG_UNIQUE_PROFILE: &str =
    "Your profile is unique! We searched for birds from clusters similar to yours.";

/// Returned instead of the strategy rationale when filtering leaves
/// nothing to suggest. A legitimate outcome, not a fault.
pub const MSG_NO_RECOMMENDATIONS: &str =
    "No new birds to suggest right now. Check back when the season changes!";

/// Rationale for the in-cluster strategy, tagged with the cluster id.
fn radar_message(cluster: ClusterId) -> String {
    format!("Radar (cluster {}): we detected these birds for your profile!", cluster)
}

/// Tunables of the ranking procedure. Defaults mirror the values the
/// artifact pipeline was built around.
#[derive(Debug, Clone, Copy)]
pub struct RankerParams {
    /// Maximum number of species returned
    pub top_n: usize,
    /// Below this many in-profile candidates the neighbor fallback runs
    pub min_recommendations: usize,
    /// Clusters consulted by the similarity-based strategies
    pub neighbor_clusters: usize,
}

impl Default for RankerParams {
    fn default() -> Self {
        Self {
            top_n: 5,
            min_recommendations: 3,
            neighbor_clusters: 3,
        }
    }
}

/// Produces an ordered species list for a user, with a rationale message.
///
/// Resolves the user's segment, picks one of four strategies (global
/// popularity, content similarity, in-cluster profile, neighbor-cluster
/// fallback) and filters every candidate list by seasonal activity and
/// by species the user has already observed. Pure over the snapshot:
/// two calls with the same artifacts and the same season return the
/// same output. `at` fixes the season for the call; the handler passes
/// the wall clock, tests pin a date.
pub fn recommend(
    artifacts: &ArtifactSet,
    user_login: &str,
    params: &RankerParams,
    at: DateTime<Utc>,
) -> Recommendation {
    let season = Season::on(at);
    let segment = segments::resolve_segment(artifacts, user_login);

    tracing::debug!(
        user = %user_login,
        segment = segment.kind(),
        season = %season,
        top_n = params.top_n,
        "Ranking recommendations"
    );

    let (message, species) = match &segment {
        Segment::NewUser => (
            MSG_NEW_USER.to_string(),
            popular_species(artifacts, season, params.top_n),
        ),
        Segment::NoiseUser { seen } if seen.is_empty() => (
            MSG_POPULAR.to_string(),
            popular_species(artifacts, season, params.top_n),
        ),
        Segment::NoiseUser { seen } => (
            MSG_UNIQUE_PROFILE.to_string(),
            content_similarity(artifacts, seen, season, params),
        ),
        Segment::Clustered { cluster, seen } => (
            radar_message(*cluster),
            in_cluster_with_fallback(artifacts, *cluster, seen, season, params),
        ),
    };

    if species.is_empty() {
        tracing::info!(
            user = %user_login,
            segment = segment.kind(),
            "Candidate pool empty after filtering"
        );
        return Recommendation {
            message: MSG_NO_RECOMMENDATIONS.to_string(),
            species,
        };
    }

    Recommendation { message, species }
}

/// Global popularity strategy: every observed species, most sighted
/// first, restricted to the current season.
fn popular_species(artifacts: &ArtifactSet, season: Season, top_n: usize) -> Vec<String> {
    artifacts
        .popularity_ranking()
        .iter()
        .filter(|species| artifacts.seasonality().is_active(species, season))
        .take(top_n)
        .cloned()
        .collect()
}

/// Content-similarity strategy for noise-segment users with history.
///
/// Builds a binary seen/unseen vector over the species columns of the
/// cluster × species table, ranks every cluster row by cosine
/// similarity against it, and accumulates profile species of the top
/// clusters weighted by their similarity score.
fn content_similarity(
    artifacts: &ArtifactSet,
    seen: &HashSet<String>,
    season: Season,
    params: &RankerParams,
) -> Vec<String> {
    let table = artifacts.cluster_species();
    if table.is_empty() {
        return Vec::new();
    }

    let user_vector: Vec<f64> = table
        .col_keys()
        .iter()
        .map(|species| if seen.contains(species) { 1.0 } else { 0.0 })
        .collect();

    let mut scored: Vec<(ClusterId, f64)> = table
        .row_keys()
        .iter()
        .filter_map(|cluster| {
            table
                .row(cluster)
                .map(|row| (*cluster, cosine_similarity(&user_vector, row)))
        })
        .collect();
    sort_scored_clusters(&mut scored);
    scored.truncate(params.neighbor_clusters);

    tracing::debug!(clusters = ?scored, "Selected similar clusters for content strategy");

    ranked_profile_species(artifacts, &scored, seen, season, params.top_n)
}

/// In-cluster strategy with neighbor fallback for clustered users.
///
/// Starts from the user's own cluster profile. When fewer than
/// `min_recommendations` candidates survive the seen/season filters,
/// tops the list up from the profiles of the most similar clusters,
/// weighted by precomputed cluster similarity.
fn in_cluster_with_fallback(
    artifacts: &ArtifactSet,
    cluster: ClusterId,
    seen: &HashSet<String>,
    season: Season,
    params: &RankerParams,
) -> Vec<String> {
    // A cluster that exists in the assignments but never produced a
    // profile contributes nothing and always falls through to neighbors.
    let mut primary: Vec<String> = artifacts
        .profile(cluster)
        .unwrap_or_default()
        .iter()
        .filter(|species| eligible(artifacts.seasonality(), species, seen, season))
        .cloned()
        .collect();

    if primary.len() >= params.min_recommendations {
        primary.truncate(params.top_n);
        return primary;
    }

    let neighbors = nearest_clusters(artifacts, cluster, params.neighbor_clusters);
    if neighbors.is_empty() {
        tracing::debug!(cluster, "No similarity row for cluster, skipping fallback");
        primary.truncate(params.top_n);
        return primary;
    }

    tracing::debug!(cluster, neighbors = ?neighbors, "Profile too short, merging neighbor clusters");

    let fallback = ranked_profile_species(artifacts, &neighbors, seen, season, usize::MAX);
    for species in fallback {
        if primary.len() >= params.top_n {
            break;
        }
        if !primary.contains(&species) {
            primary.push(species);
        }
    }

    primary.truncate(params.top_n);
    primary
}

/// Neighbor clusters of `cluster` by precomputed similarity, most
/// similar first, self excluded. Empty when the similarity table has no
/// row for the cluster.
fn nearest_clusters(
    artifacts: &ArtifactSet,
    cluster: ClusterId,
    count: usize,
) -> Vec<(ClusterId, f64)> {
    let table = artifacts.cluster_similarity();
    let Some(row) = table.row(&cluster) else {
        return Vec::new();
    };

    let mut scored: Vec<(ClusterId, f64)> = table
        .col_keys()
        .iter()
        .zip(row.iter())
        .filter(|(other, _)| **other != cluster)
        .map(|(other, similarity)| (*other, *similarity))
        .collect();
    sort_scored_clusters(&mut scored);
    scored.truncate(count);
    scored
}

/// Folds the profiles of the given clusters into one ranked candidate
/// list: each species accumulates the similarity score of every cluster
/// that lists it, ineligible species are dropped, and the result is
/// sorted by accumulated score descending with ascending species name
/// breaking ties.
fn ranked_profile_species(
    artifacts: &ArtifactSet,
    clusters: &[(ClusterId, f64)],
    seen: &HashSet<String>,
    season: Season,
    limit: usize,
) -> Vec<String> {
    // BTreeMap iterates in ascending species order; the stable sort by
    // score then yields the deterministic tie-break for free.
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    for (cluster, score) in clusters {
        let Some(profile) = artifacts.profile(*cluster) else {
            continue;
        };
        for species in profile {
            if eligible(artifacts.seasonality(), species, seen, season) {
                *scores.entry(species.clone()).or_insert(0.0) += score;
            }
        }
    }

    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .take(limit)
        .map(|(species, _)| species)
        .collect()
}

/// Whether a profiled species may be suggested: unseen and in season.
///
/// A profile species without any seasonality entry is a pipeline gap;
/// it degrades to "never in season" with a log rather than an error.
fn eligible(
    seasonality: &SpeciesSeasonality,
    species: &str,
    seen: &HashSet<String>,
    season: Season,
) -> bool {
    if seen.contains(species) {
        return false;
    }
    if !seasonality.contains(species) {
        tracing::warn!(species, "Profiled species has no seasonality entry, excluding");
        return false;
    }
    seasonality.is_active(species, season)
}

/// Higher similarity first; ascending cluster id on equal scores.
fn sort_scored_clusters(scored: &mut [(ClusterId, f64)]) {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
}

/// Cosine similarity of two equal-length vectors; 0.0 when either norm
/// is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyedMatrix, Observation, NOISE_CLUSTER};
    use chrono::TimeZone;
    use std::collections::HashMap;

    // January, Southern-Hemisphere summer.
    fn summer_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap()
    }

    fn obs(user: &str, species: &str) -> Observation {
        Observation {
            user_login: user.to_string(),
            scientific_name: species.to_string(),
            common_name: species.to_string(),
            observed_at: Utc.with_ymd_and_hms(2024, 11, 2, 6, 45, 0).unwrap(),
            latitude: -23.55,
            longitude: -46.63,
            image_url: None,
        }
    }

    fn seasonality(species: &[(&str, Vec<Season>)]) -> SpeciesSeasonality {
        SpeciesSeasonality::new(
            species
                .iter()
                .map(|(name, seasons)| (name.to_string(), seasons.clone()))
                .collect(),
        )
    }

    fn all_summer(species: &[&str]) -> SpeciesSeasonality {
        seasonality(
            &species
                .iter()
                .map(|s| (*s, vec![Season::Summer]))
                .collect::<Vec<_>>(),
        )
    }

    struct Fixture {
        observations: Vec<Observation>,
        clusters: HashMap<String, i32>,
        profiles: HashMap<i32, Vec<String>>,
        seasonality: SpeciesSeasonality,
        cluster_species: KeyedMatrix<i32, String>,
        cluster_similarity: KeyedMatrix<i32, i32>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                observations: Vec::new(),
                clusters: HashMap::new(),
                profiles: HashMap::new(),
                seasonality: SpeciesSeasonality::default(),
                cluster_species: KeyedMatrix::from_rows(Vec::new(), Vec::new()).unwrap(),
                cluster_similarity: KeyedMatrix::from_rows(Vec::new(), Vec::new()).unwrap(),
            }
        }

        fn build(self) -> ArtifactSet {
            ArtifactSet::new(
                self.observations,
                self.clusters,
                self.profiles,
                self.seasonality,
                self.cluster_species,
                self.cluster_similarity,
            )
        }
    }

    fn species_matrix(cols: &[&str], rows: Vec<(i32, Vec<f64>)>) -> KeyedMatrix<i32, String> {
        KeyedMatrix::from_rows(cols.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    fn similarity_matrix(clusters: &[i32], rows: Vec<(i32, Vec<f64>)>) -> KeyedMatrix<i32, i32> {
        KeyedMatrix::from_rows(clusters.to_vec(), rows).unwrap()
    }

    #[test]
    fn test_new_user_gets_in_season_popularity() {
        let mut fx = Fixture::new();
        // Ccc most popular, then Aaa, then Bbb (name tie-break).
        for user in ["u1", "u2", "u3"] {
            fx.observations.push(obs(user, "Ccc"));
        }
        for user in ["u1", "u2"] {
            fx.observations.push(obs(user, "Aaa"));
            fx.observations.push(obs(user, "Bbb"));
        }
        // Bbb is out of season in summer.
        fx.seasonality = seasonality(&[
            ("Aaa", vec![Season::Summer]),
            ("Bbb", vec![Season::Winter]),
            ("Ccc", vec![Season::Summer, Season::Spring]),
        ]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "stranger", &RankerParams::default(), summer_day());
        assert_eq!(rec.message, MSG_NEW_USER);
        assert_eq!(rec.species, vec!["Ccc", "Aaa"]);
    }

    #[test]
    fn test_new_user_respects_top_n() {
        let mut fx = Fixture::new();
        for name in ["Aaa", "Bbb", "Ccc", "Ddd"] {
            fx.observations.push(obs("u1", name));
        }
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd"]);
        let artifacts = fx.build();

        let params = RankerParams {
            top_n: 2,
            ..RankerParams::default()
        };
        let rec = recommend(&artifacts, "stranger", &params, summer_day());
        assert_eq!(rec.species.len(), 2);
    }

    #[test]
    fn test_empty_pool_returns_no_recommendations_message() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("u1", "Aaa"));
        // No seasonality entries at all: nothing is ever in season.
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "stranger", &RankerParams::default(), summer_day());
        assert_eq!(rec.message, MSG_NO_RECOMMENDATIONS);
        assert!(rec.species.is_empty());
    }

    #[test]
    fn test_noise_user_content_similarity_excludes_seen() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("nina", "Aaa"));
        fx.observations.push(obs("nina", "Bbb"));
        fx.clusters.insert("nina".to_string(), NOISE_CLUSTER);

        // Cluster 0 matches nina's history exactly; cluster 1 is
        // orthogonal to it.
        fx.cluster_species = species_matrix(
            &["Aaa", "Bbb", "Ccc", "Ddd"],
            vec![
                (0, vec![0.5, 0.5, 0.0, 0.0]),
                (1, vec![0.0, 0.0, 0.5, 0.5]),
            ],
        );
        fx.profiles.insert(0, vec!["Aaa".into(), "Bbb".into(), "Ccc".into()]);
        fx.profiles.insert(1, vec!["Ddd".into()]);
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "nina", &RankerParams::default(), summer_day());
        assert_eq!(rec.message, MSG_UNIQUE_PROFILE);
        // Aaa and Bbb are seen, so only Ccc (from cluster 0) and Ddd
        // (from cluster 1) survive; cluster 0 scores higher.
        assert_eq!(rec.species, vec!["Ccc", "Ddd"]);
    }

    #[test]
    fn test_noise_user_accumulates_scores_across_clusters() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("nina", "Aaa"));
        fx.clusters.insert("nina".to_string(), NOISE_CLUSTER);

        // Both clusters resemble nina somewhat; Eee is listed by both,
        // so its accumulated score beats each cluster's solo species.
        fx.cluster_species = species_matrix(
            &["Aaa", "Bbb", "Ccc"],
            vec![
                (0, vec![0.6, 0.4, 0.0]),
                (1, vec![0.5, 0.0, 0.5]),
            ],
        );
        fx.profiles.insert(0, vec!["Eee".into(), "Bbb".into()]);
        fx.profiles.insert(1, vec!["Eee".into(), "Ccc".into()]);
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Eee"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "nina", &RankerParams::default(), summer_day());
        assert_eq!(rec.species[0], "Eee");
        assert!(rec.species.contains(&"Bbb".to_string()));
        assert!(rec.species.contains(&"Ccc".to_string()));
    }

    #[test]
    fn test_clustered_user_profile_order_preserved_without_fallback() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Zzz"));
        fx.clusters.insert("carla".to_string(), 2);
        fx.profiles.insert(
            2,
            vec!["Bbb".into(), "Aaa".into(), "Ddd".into(), "Ccc".into()],
        );
        // A neighbor exists, but the profile alone satisfies the
        // minimum, so its species must never leak into the output.
        fx.profiles.insert(3, vec!["Qqq".into()]);
        fx.cluster_similarity = similarity_matrix(
            &[2, 3],
            vec![(2, vec![1.0, 0.9]), (3, vec![0.9, 1.0])],
        );
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd", "Qqq", "Zzz"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        assert_eq!(rec.message, radar_message(2));
        // Profile frequency order, not alphabetical.
        assert_eq!(rec.species, vec!["Bbb", "Aaa", "Ddd", "Ccc"]);
        assert!(!rec.species.contains(&"Qqq".to_string()));
    }

    #[test]
    fn test_clustered_user_fallback_merges_neighbor_species() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Aaa"));
        fx.clusters.insert("carla".to_string(), 0);

        // Profile [Aaa, Bbb, Ccc] with Aaa seen leaves two candidates,
        // under the minimum of three; neighbor cluster 1 fills in.
        fx.profiles.insert(0, vec!["Aaa".into(), "Bbb".into(), "Ccc".into()]);
        fx.profiles.insert(1, vec!["Bbb".into(), "Ddd".into()]);
        fx.cluster_similarity = similarity_matrix(
            &[0, 1],
            vec![(0, vec![1.0, 0.8]), (1, vec![0.8, 1.0])],
        );
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        // Bbb and Ccc keep profile order, Ddd is appended from the
        // neighbor, and Bbb is not duplicated by the merge.
        assert_eq!(rec.species, vec!["Bbb", "Ccc", "Ddd"]);
    }

    #[test]
    fn test_missing_profile_triggers_fallback_unconditionally() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Zzz"));
        fx.clusters.insert("carla".to_string(), 7);
        // Cluster 7 never produced a profile; neighbors carry the load.
        fx.profiles.insert(1, vec!["Aaa".into()]);
        fx.profiles.insert(2, vec!["Bbb".into()]);
        fx.cluster_similarity = similarity_matrix(
            &[1, 2, 7],
            vec![
                (1, vec![1.0, 0.2, 0.6]),
                (2, vec![0.2, 1.0, 0.4]),
                (7, vec![0.6, 0.4, 1.0]),
            ],
        );
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Zzz"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        // Cluster 1 (0.6) outranks cluster 2 (0.4).
        assert_eq!(rec.species, vec!["Aaa", "Bbb"]);
    }

    #[test]
    fn test_missing_similarity_row_skips_fallback_gracefully() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Zzz"));
        fx.clusters.insert("carla".to_string(), 4);
        fx.profiles.insert(4, vec!["Aaa".into()]);
        // Similarity table knows nothing about cluster 4.
        fx.cluster_similarity =
            similarity_matrix(&[0, 1], vec![(0, vec![1.0, 0.5]), (1, vec![0.5, 1.0])]);
        fx.seasonality = all_summer(&["Aaa", "Zzz"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        assert_eq!(rec.species, vec!["Aaa"]);
    }

    #[test]
    fn test_out_of_season_species_never_returned() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Zzz"));
        fx.clusters.insert("carla".to_string(), 0);
        fx.profiles.insert(0, vec!["Aaa".into(), "Bbb".into(), "Ccc".into()]);
        fx.seasonality = seasonality(&[
            ("Aaa", vec![Season::Summer]),
            ("Bbb", vec![Season::Winter]),
            ("Ccc", vec![Season::Summer]),
            ("Zzz", vec![Season::Summer]),
        ]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        assert!(!rec.species.contains(&"Bbb".to_string()));
    }

    #[test]
    fn test_profiled_species_without_seasonality_excluded() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Zzz"));
        fx.clusters.insert("carla".to_string(), 0);
        fx.profiles.insert(0, vec!["Ghost sp.".into(), "Aaa".into(), "Bbb".into()]);
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Zzz"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        assert!(!rec.species.contains(&"Ghost sp.".to_string()));
    }

    #[test]
    fn test_idempotent_for_fixed_season() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Aaa"));
        fx.clusters.insert("carla".to_string(), 0);
        fx.profiles
            .insert(0, vec!["Bbb".into(), "Ccc".into(), "Ddd".into(), "Eee".into()]);
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd", "Eee"]);
        let artifacts = fx.build();

        let first = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        let second = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_duplicates_and_no_seen_species_in_output() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("carla", "Aaa"));
        fx.observations.push(obs("carla", "Bbb"));
        fx.clusters.insert("carla".to_string(), 0);
        fx.profiles.insert(0, vec!["Aaa".into(), "Ccc".into()]);
        fx.profiles.insert(1, vec!["Ccc".into(), "Bbb".into(), "Ddd".into()]);
        fx.cluster_similarity =
            similarity_matrix(&[0, 1], vec![(0, vec![1.0, 0.7]), (1, vec![0.7, 1.0])]);
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "carla", &RankerParams::default(), summer_day());
        let mut unique: Vec<&String> = rec.species.iter().collect();
        unique.dedup();
        assert_eq!(unique.len(), rec.species.len());
        assert!(!rec.species.contains(&"Aaa".to_string()));
        assert!(!rec.species.contains(&"Bbb".to_string()));
        assert_eq!(rec.species, vec!["Ccc", "Ddd"]);
    }

    #[test]
    fn test_cosine_similarity_zero_norm_guard() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]), 0.0);
        let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_scores_break_ties_by_species_name() {
        let mut fx = Fixture::new();
        fx.observations.push(obs("nina", "Aaa"));
        fx.clusters.insert("nina".to_string(), NOISE_CLUSTER);
        fx.cluster_species = species_matrix(&["Aaa"], vec![(0, vec![1.0])]);
        fx.profiles.insert(0, vec!["Ddd".into(), "Bbb".into(), "Ccc".into()]);
        fx.seasonality = all_summer(&["Aaa", "Bbb", "Ccc", "Ddd"]);
        let artifacts = fx.build();

        let rec = recommend(&artifacts, "nina", &RankerParams::default(), summer_day());
        // All three carry the same accumulated score; ascending name.
        assert_eq!(rec.species, vec!["Bbb", "Ccc", "Ddd"]);
    }
}
