use pipeline::{ExclusionPolicy, RankingConfig};
use serde::Deserialize;
use similarity::DEFAULT_NEIGHBORS;
use std::path::PathBuf;

/// Server configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding movies.dat (or movies.json) and engagements.dat
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Candidates need more votes than this
    #[serde(default = "default_vote_threshold")]
    pub vote_threshold: u32,

    /// Maximum recommendations per user request
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Candidates need a rating above this
    #[serde(default = "default_min_rating")]
    pub min_rating: f32,

    /// Neighbors per similar-movie request, the reference movie included
    #[serde(default = "default_neighbor_count")]
    pub neighbor_count: usize,

    #[serde(default)]
    pub exclusion: ExclusionPolicy,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/sample")
}

fn default_vote_threshold() -> u32 {
    1000
}

fn default_top_n() -> usize {
    10
}

fn default_min_rating() -> f32 {
    5.0
}

fn default_neighbor_count() -> usize {
    DEFAULT_NEIGHBORS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            vote_threshold: default_vote_threshold(),
            top_n: default_top_n(),
            min_rating: default_min_rating(),
            neighbor_count: default_neighbor_count(),
            exclusion: ExclusionPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Ranking rules for profile requests
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig::default()
            .with_min_rating(self.min_rating)
            .with_min_vote_count(self.vote_threshold)
            .with_top_n(self.top_n)
            .with_exclusion(self.exclusion)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
