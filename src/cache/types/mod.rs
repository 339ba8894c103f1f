/// Defines the type for the size of a single chunk moved between a file and memory
pub type BufferSize = usize;

/// Defines the type for the total number of worker threads performing physical I/O
pub type IoPoolSize = usize;

/// Defines a flag to denote if the current working directory is persisted in the root marker file
pub type IsPersistent = bool;

/// Defines a flag to denote if an operation was newly started, as opposed to being attached to an in-flight one
pub type IsNewlyStarted = bool;

/// Defines the type for the payload stored against a cache key
pub type Payload = Vec<u8>;
