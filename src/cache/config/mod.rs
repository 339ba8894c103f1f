use std::path::PathBuf;

use crate::cache::clock::{ClockType, SystemClock};
use crate::cache::errors::Errors;
use crate::cache::policy::serializer::{JsonPolicySerializer, PolicySerializer};
use crate::cache::types::{BufferSize, IoPoolSize, IsPersistent};

const BUFFER_SIZE: BufferSize = 1024;
const IO_POOL_SIZE: IoPoolSize = 4;
const PERSISTENT: IsPersistent = true;

/// Defines the config for [`crate::cache::cache_manager::CacheManager`].
/// `root_path`: directory that holds the marker file and every working directory
/// `persistent`: records the current working directory in the marker file, so that it survives restarts
/// `buffer_size`: size of the chunk moved between a file and memory in one step
/// `io_pool_size`: number of worker threads performing the physical reads and writes
/// `enforce_key_validation`: rejects invalid keys in every operation instead of leaving validation to the caller
/// `clock`: used by callers to build expiring policies relative to "now"
/// `policy_serializer`: converts a policy to and from the text of the policy file
pub struct Config {
    pub root_path: PathBuf,
    pub persistent: IsPersistent,
    pub buffer_size: BufferSize,
    pub io_pool_size: IoPoolSize,
    pub enforce_key_validation: bool,
    pub clock: ClockType,
    pub policy_serializer: Box<dyn PolicySerializer>,
}

pub struct ConfigBuilder {
    root_path: PathBuf,
    persistent: IsPersistent,
    buffer_size: BufferSize,
    io_pool_size: IoPoolSize,
    enforce_key_validation: bool,
    clock: ClockType,
    policy_serializer: Box<dyn PolicySerializer>,
}

impl ConfigBuilder {
    pub fn new<P: Into<PathBuf>>(root_path: P) -> Self {
        ConfigBuilder {
            root_path: root_path.into(),
            persistent: PERSISTENT,
            buffer_size: BUFFER_SIZE,
            io_pool_size: IO_POOL_SIZE,
            enforce_key_validation: false,
            clock: SystemClock::boxed(),
            policy_serializer: JsonPolicySerializer::boxed(),
        }
    }

    pub fn persistent(mut self, persistent: IsPersistent) -> ConfigBuilder {
        self.persistent = persistent;
        self
    }

    pub fn buffer_size(mut self, buffer_size: BufferSize) -> ConfigBuilder {
        assert!(buffer_size > 0, "{}", Errors::BufferSizeGtZero);
        self.buffer_size = buffer_size;
        self
    }

    pub fn io_pool_size(mut self, io_pool_size: IoPoolSize) -> ConfigBuilder {
        assert!(io_pool_size > 0, "{}", Errors::IoPoolSizeGtZero);
        self.io_pool_size = io_pool_size;
        self
    }

    pub fn enforce_key_validation(mut self, enforce_key_validation: bool) -> ConfigBuilder {
        self.enforce_key_validation = enforce_key_validation;
        self
    }

    pub fn clock(mut self, clock: ClockType) -> ConfigBuilder {
        self.clock = clock;
        self
    }

    pub fn policy_serializer(mut self, policy_serializer: Box<dyn PolicySerializer>) -> ConfigBuilder {
        self.policy_serializer = policy_serializer;
        self
    }

    pub fn build(self) -> Config {
        Config {
            root_path: self.root_path,
            persistent: self.persistent,
            buffer_size: self.buffer_size,
            io_pool_size: self.io_pool_size,
            enforce_key_validation: self.enforce_key_validation,
            clock: self.clock,
            policy_serializer: self.policy_serializer,
        }
    }
}
