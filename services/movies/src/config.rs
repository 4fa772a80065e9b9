use serde::Deserialize;

use cinema_core::config::Config;

/// Movies service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct MoviesConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `MOVIES_PORT`.
    #[serde(default = "default_movies_port")]
    pub movies_port: u16,
}

fn default_movies_port() -> u16 {
    3114
}

impl Config for MoviesConfig {}
