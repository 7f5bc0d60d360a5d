//! Shared cache adapters.
//!
//! - `InMemoryCache` - process-local, for tests and single-instance deployments
//! - `RedisCache` - Redis-backed, shared across gateway instances

mod in_memory;
mod redis;

pub use in_memory::InMemoryCache;
pub use self::redis::RedisCache;
