use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the precomputed artifact files
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendations returned when the client does not ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Below this many in-profile candidates, the neighbor-cluster
    /// fallback kicks in
    #[serde(default = "default_min_recommendations")]
    pub min_recommendations: usize,

    /// Clusters consulted by the content-similarity and fallback
    /// strategies
    #[serde(default = "default_neighbor_clusters")]
    pub neighbor_clusters: usize,

    /// Per-cluster profile length enforced at artifact load
    #[serde(default = "default_profile_size")]
    pub profile_size: usize,
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    5
}

fn default_min_recommendations() -> usize {
    3
}

fn default_neighbor_clusters() -> usize {
    3
}

fn default_profile_size() -> usize {
    15
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifacts_dir: default_artifacts_dir(),
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            min_recommendations: default_min_recommendations(),
            neighbor_clusters: default_neighbor_clusters(),
            profile_size: default_profile_size(),
        }
    }
}
