//! User store implementations.

mod connections;
mod memory;

pub use connections::DatabaseConfig;
pub use memory::InMemoryUserRepository;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres::PostgresUserRepository;
