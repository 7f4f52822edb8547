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

    /// Anime listing endpoint of the catalog backend
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// JSON file to serve the catalog from instead of the backend
    #[serde(default)]
    pub catalog_file: Option<String>,

    /// Redis connection URL; the catalog cache is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Catalog cache TTL in seconds
    #[serde(default = "default_catalog_cache_ttl")]
    pub catalog_cache_ttl: u64,

    /// Seed for reproducible recommendation picks
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Seconds an untouched quiz is kept before it is dropped
    #[serde(default = "default_quiz_idle_ttl")]
    pub quiz_idle_ttl: u64,

    /// Most quizzes kept in memory at once
    #[serde(default = "default_max_quizzes")]
    pub max_quizzes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_catalog_url() -> String {
    "http://localhost:3000/api/animes".to_string()
}

fn default_catalog_cache_ttl() -> u64 {
    300
}

fn default_quiz_idle_ttl() -> u64 {
    1800
}

fn default_max_quizzes() -> usize {
    10_000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
