//! Cache backends implementing the `CacheStore` port

pub mod memory;

pub use memory::MemoryCacheStore;
