//! Cache maintenance

pub mod handlers;

pub use handlers::*;
