mod entry;
mod port;
mod storage;

pub use entry::CacheEntry;
pub use storage::ResponseCache;
