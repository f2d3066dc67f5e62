use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single sighting event, one row per observation.
///
/// Produced by the upstream ingestion pipeline and read-only here.
/// `scientific_name` doubles as the species identifier throughout the
/// engine; `common_name` and `image_url` are display metadata the
/// presentation layer resolves through these records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    /// Observer's login in the upstream platform
    pub user_login: String,
    /// Species identifier (scientific name)
    pub scientific_name: String,
    /// Vernacular name for display
    pub common_name: String,
    /// When the sighting was recorded
    pub observed_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Photo reference, when the sighting carried one
    #[serde(default)]
    pub image_url: Option<String>,
}
