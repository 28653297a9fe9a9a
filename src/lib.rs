//! # Hotel Booking Service
//!
//! Hotel inventory, guest accounts and a reservation state machine behind a
//! REST API.
//!
//! ## Architecture
//!
//! - **domain**: aggregates, booking lifecycle rules and repository traits
//! - **application**: booking and inventory services, cache, events
//! - **infrastructure**: SeaORM storage, in-memory storage and cache store
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, run_migrations, DatabaseConfig, InMemoryRepositoryProvider,
    SeaOrmRepositoryProvider,
};

pub use interfaces::http::{create_api_router, AppState};

pub use application::{create_event_bus, EventBus, SharedEventBus};
