pub mod best_effort;
pub mod errors;
pub mod pagination;
pub mod shutdown;

pub use best_effort::best_effort;
pub use errors::{DomainError, DomainResult};
pub use pagination::{PaginatedResult, PaginationParams};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
