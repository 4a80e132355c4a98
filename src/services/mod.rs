// Service exports
pub mod cache;
pub mod loader;

pub use cache::{CacheStats, VerdictCache};
pub use loader::{load_all, LoadError, StaticData};
