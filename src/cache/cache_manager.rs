use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::cache::clock::ClockType;
use crate::cache::coalescer::{OperationOutcome, RequestCoalescer};
use crate::cache::config::Config;
use crate::cache::directory::CacheDirectoryManager;
use crate::cache::errors::{CacheError, Errors};
use crate::cache::executor::IoExecutor;
use crate::cache::key::validate_cache_key;
use crate::cache::policy::cache_policy::CachePolicy;
use crate::cache::policy::policy_store::PolicyStore;
use crate::cache::stats::{ConcurrentStatsCounter, StatsSummary};
use crate::cache::stream::StreamStore;
use crate::cache::types::Payload;

/// CacheManager stores byte payloads and their policies as files under the current working directory.
///
/// Reads and writes of the same key are coalesced: at most one physical operation per key is in flight,
/// concurrent callers attach to it and share its result. A read attaching to an in-flight write or to an operation
/// in a rotated working directory, and a write that could not start because another operation is in flight,
/// wait for that operation and re-issue themselves.
///
/// Keys are not validated unless [`crate::cache::config::ConfigBuilder::enforce_key_validation`] is set,
/// callers are expected to invoke [`CacheManager::validate_cache_key`] before using a key.
pub struct CacheManager {
    directory_manager: CacheDirectoryManager,
    coalescer: RequestCoalescer,
    stream_store: StreamStore,
    policy_store: PolicyStore,
    executor: IoExecutor,
    enforce_key_validation: bool,
    clock: ClockType,
    stats_counter: Arc<ConcurrentStatsCounter>,
}

impl CacheManager {
    /// Creates the cache and establishes the current working directory, recovering it from the marker file
    /// in persistent mode.
    pub fn new(config: Config) -> Result<Self, CacheError> {
        let directory_manager = CacheDirectoryManager::initialize(config.root_path, config.persistent)?;
        let stats_counter = Arc::new(ConcurrentStatsCounter::new());

        info!(
            "Initialized CacheManager with working directory {:?}, buffer size {} and io pool size {}",
            directory_manager.current_directory(), config.buffer_size, config.io_pool_size
        );
        Ok(CacheManager {
            directory_manager,
            coalescer: RequestCoalescer::new(),
            stream_store: StreamStore::new(config.buffer_size, stats_counter.clone()),
            policy_store: PolicyStore::new(config.policy_serializer),
            executor: IoExecutor::new(config.io_pool_size),
            enforce_key_validation: config.enforce_key_validation,
            clock: config.clock,
            stats_counter,
        })
    }

    /// Returns the payload stored against the key in the current working directory, `None` if there is no entry.
    pub async fn read_stream(&self, key: &str) -> Result<Option<Payload>, CacheError> {
        self.ensure_valid(key)?;
        loop {
            let path = self.directory_manager.entry_path(key);
            let submission = self.coalescer.submit(key, &path, "read_stream", |ticket| {
                self.executor.execute(self.stream_store.read(path.clone(), ticket));
            });
            if !submission.is_newly_started() {
                self.stats_counter.attached_a_request();
            }
            let result = submission.wait().await;
            if !submission.targets(&path) {
                debug!("read_stream for key {:?} attached to an operation in a rotated directory, re-issuing the read", key);
                self.stats_counter.retried_a_request();
                continue;
            }
            match result? {
                OperationOutcome::ReadCompleted(payload) => {
                    if payload.is_none() {
                        self.stats_counter.found_a_miss();
                    }
                    return Ok(payload);
                }
                OperationOutcome::WriteCompleted => {
                    debug!("read_stream for key {:?} attached to a write, re-issuing the read", key);
                    self.stats_counter.retried_a_request();
                }
            }
        }
    }

    /// Stores the payload against the key in the current working directory, replacing any existing entry.
    /// A failure in the middle of the transfer may leave a truncated entry behind.
    pub async fn write_stream(&self, key: &str, payload: Payload) -> Result<(), CacheError> {
        self.ensure_valid(key)?;
        let payload = Arc::new(payload);
        loop {
            let path = self.directory_manager.entry_path(key);
            let submission = self.coalescer.submit(key, &path, "write_stream", |ticket| {
                self.executor.execute(self.stream_store.write(path.clone(), payload.clone(), ticket));
            });
            let result = submission.wait().await;
            if submission.is_newly_started() {
                return result.map(|_outcome| ());
            }
            debug!("write_stream for key {:?} found an in-flight operation, re-issuing the write", key);
            self.stats_counter.attached_a_request();
            self.stats_counter.retried_a_request();
        }
    }

    /// Returns the policy of the key, [`CachePolicy::Invalid`] if it is missing or unusable.
    pub fn get_cache_policy(&self, key: &str) -> CachePolicy {
        if self.ensure_valid(key).is_err() {
            return CachePolicy::Invalid;
        }
        self.policy_store.get(&self.directory_manager.policy_path(key))
    }

    pub fn set_cache_policy(&self, key: &str, policy: &CachePolicy) -> Result<(), CacheError> {
        self.ensure_valid(key)?;
        self.policy_store.set(&self.directory_manager.policy_path(key), policy)
    }

    /// Removes the policy of the key. The entry itself is left in place and becomes unreachable only when
    /// the working directory is rotated.
    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.ensure_valid(key)?;
        self.policy_store.remove(&self.directory_manager.policy_path(key))
    }

    pub fn validate_cache_key(&self, key: &str) -> Result<(), Errors> {
        validate_cache_key(key)
    }

    /// Logically invalidates every entry by switching to a fresh working directory.
    pub fn assign_cache_directory(&self) -> Result<(), CacheError> {
        self.directory_manager.assign_cache_directory()?;
        self.stats_counter.rotated_directory();
        Ok(())
    }

    pub fn current_directory(&self) -> PathBuf {
        self.directory_manager.current_directory()
    }

    pub fn root_path(&self) -> &Path {
        self.directory_manager.root()
    }

    /// Returns the number of physical operations currently in flight.
    pub fn in_flight_operations(&self) -> usize {
        self.coalescer.in_flight_count()
    }

    pub fn clock(&self) -> &ClockType {
        &self.clock
    }

    pub fn stats_summary(&self) -> StatsSummary {
        self.stats_counter.summary()
    }

    /// Stops the I/O workers and deletes the root path recursively, destroying every working directory.
    /// This can not be undone.
    pub fn destroy(self) -> Result<(), CacheError> {
        self.executor.shutdown();
        self.directory_manager.remove_root()
    }

    fn ensure_valid(&self, key: &str) -> Result<(), CacheError> {
        if self.enforce_key_validation {
            validate_cache_key(key)?;
        }
        Ok(())
    }
}
