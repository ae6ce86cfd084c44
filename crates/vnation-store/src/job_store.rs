//! Generation results, looked up by job id.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::debug;

use vnation_models::{GenerationResult, JobId};

use crate::error::{StoreError, StoreResult};

/// How long a result stays readable by default.
pub const DEFAULT_JOB_TTL_SECS: u64 = 86_400;

/// Most results the in-memory store holds at once.
pub const DEFAULT_MEMORY_JOB_CAPACITY: usize = 10_000;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn put(&self, result: &GenerationResult) -> StoreResult<()>;

    async fn get(&self, job_id: &JobId) -> StoreResult<Option<GenerationResult>>;

    /// Check that the backing store answers.
    async fn ping(&self) -> StoreResult<()>;
}

/// Results stored as JSON strings with an expiry.
pub struct RedisJobStore {
    client: redis::Client,
    namespace: String,
    ttl_secs: u64,
}

impl RedisJobStore {
    pub fn new(redis_url: &str, namespace: impl Into<String>, ttl_secs: u64) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            namespace: namespace.into(),
            ttl_secs,
        })
    }

    pub fn key(&self, job_id: &JobId) -> String {
        format!("{}:job:{}", self.namespace, job_id)
    }
}

#[async_trait]
impl JobStore for RedisJobStore {
    async fn put(&self, result: &GenerationResult) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = self.key(&result.job_id);
        let payload = serde_json::to_string(result)?;

        debug!("Storing job result under {}", key);
        conn.set_ex::<_, _, ()>(key, payload, self.ttl_secs).await?;
        Ok(())
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<Option<GenerationResult>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(self.key(job_id)).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(StoreError::unavailable(format!("unexpected PING reply: {}", pong)))
        }
    }
}

struct StoredJob {
    result: GenerationResult,
    stored_at: Instant,
}

/// Process-local results.
///
/// Entries expire after the TTL. When full, the oldest entry makes room
/// for a new one.
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, StoredJob>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for MemoryJobStore {
    fn default() -> Self {
        Self::with_limits(
            Duration::from_secs(DEFAULT_JOB_TTL_SECS),
            DEFAULT_MEMORY_JOB_CAPACITY,
        )
    }
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Number of entries held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn put(&self, result: &GenerationResult) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        let now = Instant::now();
        let ttl = self.ttl;
        jobs.retain(|_, job| now.duration_since(job.stored_at) < ttl);

        if !jobs.contains_key(&result.job_id) && jobs.len() >= self.capacity {
            let oldest = jobs
                .iter()
                .min_by_key(|(_, job)| job.stored_at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!("Evicting job {} from memory store", oldest);
                jobs.remove(&oldest);
            }
        }

        jobs.insert(
            result.job_id.clone(),
            StoredJob {
                result: result.clone(),
                stored_at: now,
            },
        );
        Ok(())
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<Option<GenerationResult>> {
        let jobs = self.jobs.read().await;
        Ok(jobs
            .get(job_id)
            .filter(|job| job.stored_at.elapsed() < self.ttl)
            .map(|job| job.result.clone()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
