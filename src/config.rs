use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Music catalog (Deezer) API base URL
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Per-call catalog timeout in seconds
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Path to the SeetaFace frontal face model used by the face detector
    #[serde(default = "default_face_model_path")]
    pub face_model_path: String,

    /// Number of tracks returned by the recommendation endpoints
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Default number of tracks returned by free-text search
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Fixed seed for genre/mood selection. Unset means fresh entropy per request.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_catalog_api_url() -> String {
    "https://api.deezer.com".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_face_model_path() -> String {
    "seeta_fd_frontal_v1.0.bin".to_string()
}

fn default_recommendation_limit() -> usize {
    8
}

fn default_search_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make every request degenerate
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recommendation_limit == 0 {
            anyhow::bail!("RECOMMENDATION_LIMIT must be positive");
        }
        if self.search_limit == 0 {
            anyhow::bail!("SEARCH_LIMIT must be positive");
        }
        if self.catalog_timeout_secs == 0 {
            anyhow::bail!("CATALOG_TIMEOUT_SECS must be positive");
        }
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
