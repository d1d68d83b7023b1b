//! Remote data access: the gateway and its de-duplication cache.

pub mod dedup;
pub mod gateway;

pub use dedup::FetchCache;
pub use gateway::{ApiError, FetchResult, Gateway};
