pub mod cache_manager;
pub mod clock;
pub mod config;
pub mod errors;
pub mod key;
pub mod policy;
pub mod stats;
pub mod types;
pub(crate) mod coalescer;
pub(crate) mod directory;
pub(crate) mod executor;
pub(crate) mod stream;
