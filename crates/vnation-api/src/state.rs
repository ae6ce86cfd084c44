//! Application state.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use vnation_providers::{FalVideoProvider, GeminiRefiner, GenerationOrchestrator};
use vnation_store::{
    JobStore, MemoryJobStore, RedisJobStore, RedisUserStore, DEFAULT_MEMORY_JOB_CAPACITY,
};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::services::AccountService;

const ACCOUNTS_NOT_CONFIGURED: &str = "Account store not configured";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: GenerationOrchestrator,
    pub jobs: Arc<dyn JobStore>,
    pub accounts: Option<AccountService>,
}

impl AppState {
    /// Create application state from configuration and the provider environment.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let video = FalVideoProvider::from_env();
        if !video.is_configured() {
            warn!("FAL_KEY not set, /generate will serve the mock video");
        }
        let refiner = GeminiRefiner::from_env();
        if !refiner.is_configured() {
            warn!("GOOGLE_API_KEY not set, /refine will use local refinement");
        }
        let orchestrator = GenerationOrchestrator::new(Arc::new(video), Arc::new(refiner));

        let stores = &config.stores;
        let jobs: Arc<dyn JobStore> = match &stores.redis_url {
            Some(url) => {
                info!("Job results stored in Redis (ttl={}s)", stores.job_ttl_secs);
                Arc::new(RedisJobStore::new(
                    url,
                    stores.job_namespace.clone(),
                    stores.job_ttl_secs,
                )?)
            }
            None => {
                info!(
                    "REDIS_URL not set, job results kept in memory (ttl={}s, capacity={})",
                    stores.job_ttl_secs, DEFAULT_MEMORY_JOB_CAPACITY
                );
                Arc::new(MemoryJobStore::with_limits(
                    Duration::from_secs(stores.job_ttl_secs),
                    DEFAULT_MEMORY_JOB_CAPACITY,
                ))
            }
        };

        let accounts = match &stores.account_db_url {
            Some(url) => {
                let users = RedisUserStore::new(url, stores.account_db_name.clone())?;
                Some(AccountService::new(Arc::new(users)))
            }
            None => {
                warn!("ACCOUNT_DB_URL not set, signup and login are disabled");
                None
            }
        };

        Ok(Self::from_parts(config, orchestrator, jobs, accounts))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        config: ApiConfig,
        orchestrator: GenerationOrchestrator,
        jobs: Arc<dyn JobStore>,
        accounts: Option<AccountService>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            jobs,
            accounts,
        }
    }

    /// The account service, or 503 when no account store is configured.
    pub fn accounts(&self) -> ApiResult<&AccountService> {
        self.accounts
            .as_ref()
            .ok_or_else(|| ApiError::service_unavailable(ACCOUNTS_NOT_CONFIGURED))
    }
}
