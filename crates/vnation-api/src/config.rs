//! API configuration.

use std::path::PathBuf;

use vnation_store::DEFAULT_JOB_TTL_SECS;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Serve `/metrics`
    pub metrics_enabled: bool,
    /// Directory holding the HTML pages
    pub templates_dir: PathBuf,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Directory served under `/mockvideos`
    pub mock_videos_dir: PathBuf,
    /// Job and account stores
    pub stores: StoreConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
            metrics_enabled: true,
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
            mock_videos_dir: PathBuf::from("mockvideos"),
            stores: StoreConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            templates_dir: std::env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            mock_videos_dir: std::env::var("MOCK_VIDEOS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.mock_videos_dir),
            stores: StoreConfig::from_env(),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.environment)
    }
}

/// Whether an `ENVIRONMENT` value names production, ignoring case.
pub fn is_production_environment(environment: &str) -> bool {
    environment.trim().eq_ignore_ascii_case("production")
}

/// Where job results and accounts live.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis for job results; unset keeps them in memory
    pub redis_url: Option<String>,
    /// Key prefix for job results
    pub job_namespace: String,
    /// Seconds a job result stays readable
    pub job_ttl_secs: u64,
    /// Account store URL; unset disables signup and login
    pub account_db_url: Option<String>,
    /// Key prefix for user records
    pub account_db_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            job_namespace: "vnation".to_string(),
            job_ttl_secs: DEFAULT_JOB_TTL_SECS,
            account_db_url: None,
            account_db_name: "videonation".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: non_empty_var("REDIS_URL"),
            job_namespace: defaults.job_namespace,
            job_ttl_secs: std::env::var("JOB_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.job_ttl_secs),
            account_db_url: non_empty_var("ACCOUNT_DB_URL"),
            account_db_name: non_empty_var("ACCOUNT_DB_NAME").unwrap_or(defaults.account_db_name),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
