//! Verification token store backends - Redis and in-memory fallback.

mod memory;

pub use memory::InMemoryTokenStore;

#[cfg(feature = "redis")]
mod redis_store;
#[cfg(feature = "redis")]
pub use redis_store::{RedisConfig, RedisTokenStore};
