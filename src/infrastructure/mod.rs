//! Infrastructure layer - external concerns

pub mod cache;
pub mod database;
pub mod storage;

pub use cache::MemoryCacheStore;
pub use database::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use storage::InMemoryRepositoryProvider;
