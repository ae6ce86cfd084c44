//! Persistence for generation results and user accounts.
//!
//! Both stores have a Redis implementation and an in-memory one.

pub mod error;
pub mod job_store;
pub mod user_store;

pub use error::{StoreError, StoreResult};
pub use job_store::{
    JobStore, MemoryJobStore, RedisJobStore, DEFAULT_JOB_TTL_SECS, DEFAULT_MEMORY_JOB_CAPACITY,
};
pub use user_store::{MemoryUserStore, RedisUserStore, UserStore};
