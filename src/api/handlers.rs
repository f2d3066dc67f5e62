use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{ArtifactCounts, ClusterId, SpeciesInfo};
use crate::services::{recommendations, segments, RankerParams};

use super::AppState;

/// Upper bound on a caller-supplied top_n; larger requests are clamped.
const MAX_TOP_N: usize = 50;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Overrides the configured default when present
    pub top_n: Option<usize>,
}

/// One suggested species, with the display metadata the observation
/// records can resolve. Names and images are absent for species the
/// current observation set never recorded.
#[derive(Debug, Serialize)]
pub struct RecommendedSpecies {
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_login: String,
    pub segment: String,
    pub cluster: Option<ClusterId>,
    pub message: String,
    pub species: Vec<RecommendedSpecies>,
}

/// The observer's "Birdedex": segment classification plus the species
/// collected so far, with display metadata.
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub user_login: String,
    pub segment: String,
    pub cluster: Option<ClusterId>,
    pub species_seen: usize,
    pub species: Vec<SpeciesInfo>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub counts: ArtifactCounts,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Ranks species suggestions for one user.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_login): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    if user_login.trim().is_empty() {
        return Err(AppError::InvalidInput("user_login must not be empty".to_string()));
    }
    let top_n = query.top_n.unwrap_or(state.config().default_top_n);
    if top_n == 0 {
        return Err(AppError::InvalidInput("top_n must be at least 1".to_string()));
    }
    let top_n = top_n.min(MAX_TOP_N);

    let params = RankerParams {
        top_n,
        min_recommendations: state.config().min_recommendations,
        neighbor_clusters: state.config().neighbor_clusters,
    };

    let artifacts = state.snapshot().await;
    let segment = segments::resolve_segment(&artifacts, &user_login);
    let recommendation = recommendations::recommend(&artifacts, &user_login, &params, Utc::now());

    tracing::info!(
        request_id = %request_id,
        user = %user_login,
        segment = segment.kind(),
        returned = recommendation.species.len(),
        "Recommendation served"
    );

    let species = recommendation
        .species
        .into_iter()
        .map(|scientific_name| {
            let info = artifacts.species_info(&scientific_name);
            RecommendedSpecies {
                common_name: info.map(|i| i.common_name.clone()),
                image_url: info.and_then(|i| i.image_url.clone()),
                scientific_name,
            }
        })
        .collect();

    Ok(Json(RecommendationResponse {
        user_login,
        segment: segment.kind().to_string(),
        cluster: segment.cluster(),
        message: recommendation.message,
        species,
    }))
}

/// Reports how the engine currently classifies a user, with their
/// collected species.
pub async fn user_profile(
    State(state): State<AppState>,
    Path(user_login): Path<String>,
) -> AppResult<Json<UserProfileResponse>> {
    let artifacts = state.snapshot().await;
    let segment = segments::resolve_segment(&artifacts, &user_login);

    let mut species: Vec<SpeciesInfo> = segment
        .seen()
        .map(|seen| {
            seen.iter()
                .filter_map(|name| artifacts.species_info(name).cloned())
                .collect()
        })
        .unwrap_or_default();
    species.sort_by(|a, b| a.scientific_name.cmp(&b.scientific_name));

    Ok(Json(UserProfileResponse {
        user_login,
        segment: segment.kind().to_string(),
        cluster: segment.cluster(),
        species_seen: segment.seen().map(|s| s.len()).unwrap_or(0),
        species,
    }))
}

/// Display metadata for one species, resolved from the observations.
pub async fn species_detail(
    State(state): State<AppState>,
    Path(scientific_name): Path<String>,
) -> AppResult<Json<SpeciesInfo>> {
    let artifacts = state.snapshot().await;
    let info = artifacts
        .species_info(&scientific_name)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("species {}", scientific_name)))?;
    Ok(Json(info))
}

/// Re-reads the artifact directory and swaps the snapshot in atomically.
pub async fn reload_artifacts(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<ReloadResponse>> {
    tracing::info!(request_id = %request_id, "Reloading artifacts");
    let counts = state.reload().await?;
    Ok(Json(ReloadResponse { counts }))
}
