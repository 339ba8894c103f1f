//! Disk backed cache storage.
//!
//! Byte payloads are stored as files under a rotating working directory, next to a small
//! per key policy record. Concurrent physical operations on the same key are coalesced so that
//! at most one read or write per key is in flight at any time.
//! The entry point is [`cache::cache_manager::CacheManager`].
pub mod cache;
