//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `modules`: per-resource DTOs and handlers
//! - `state`: services shared by all handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;
pub mod state;

#[cfg(test)]
mod tests;

pub use router::{create_api_router, ApiDoc};
pub use state::AppState;
