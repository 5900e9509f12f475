// Service exports
pub mod appwrite;
pub mod cache;
pub mod catalog;

pub use appwrite::{AppwriteClient, AppwriteError};
pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use catalog::CatalogLoader;
