use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;

const ERROR_MESSAGE_BUFFER_SIZE_GT_ZERO: &str = "Buffer size must be greater than zero";
const ERROR_MESSAGE_IO_POOL_SIZE_GT_ZERO: &str = "I/O pool size must be greater than zero";
const ERROR_MESSAGE_EMPTY_CACHE_KEY: &str = "Cache key must not be empty";
const ERROR_MESSAGE_CACHE_KEY_CONTAINS_DOT: &str = "Cache key must not contain '.', it is reserved for the policy file suffix";
const ERROR_MESSAGE_CACHE_KEY_RESERVED_CHARACTER: &str = "Cache key must not contain a character reserved by the filesystem";
const SHUTDOWN_MESSAGE: &str = "could not complete the operation, probably the cache is being shutdown.";

/// Errors enum define the configuration and key validation errors.
/// Errors are categorized either as OperationError or ConfigError under [`ErrorType`] enum.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Errors {
    BufferSizeGtZero,
    IoPoolSizeGtZero,
    EmptyCacheKey,
    CacheKeyContainsDot(String),
    CacheKeyContainsReservedCharacter(String, char),
}

pub(crate) enum ErrorType {
    ConfigError,
    OperationError(&'static str),
}

impl Display for ErrorType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::ConfigError =>
                write!(formatter, "Config error"),
            ErrorType::OperationError(operation) =>
                write!(formatter, "Operation {}", operation),
        }
    }
}

impl Display for Errors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Errors::BufferSizeGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_BUFFER_SIZE_GT_ZERO),
            Errors::IoPoolSizeGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_IO_POOL_SIZE_GT_ZERO),
            Errors::EmptyCacheKey =>
                write!(formatter, "[{}]: {}", ErrorType::OperationError("validate_cache_key"), ERROR_MESSAGE_EMPTY_CACHE_KEY),
            Errors::CacheKeyContainsDot(key) =>
                write!(formatter, "[{}]: {}, key: {:?}", ErrorType::OperationError("validate_cache_key"), ERROR_MESSAGE_CACHE_KEY_CONTAINS_DOT, key),
            Errors::CacheKeyContainsReservedCharacter(key, character) =>
                write!(formatter, "[{}]: {} {:?}, key: {:?}", ErrorType::OperationError("validate_cache_key"), ERROR_MESSAGE_CACHE_KEY_RESERVED_CHARACTER, character, key),
        }
    }
}

impl Error for Errors {}

/// CacheError is returned by the operations that touch the disk.
///
/// A single physical operation may be shared by many coalesced callers, so `CacheError` is `Clone`:
/// every caller attached to a failing operation receives an identical copy of the failure.
#[derive(Clone, Eq, PartialEq)]
pub enum CacheError {
    Io {
        operation: &'static str,
        kind: io::ErrorKind,
        message: String,
    },
    InvalidKey(Errors),
    Shutdown(&'static str),
}

impl CacheError {
    pub(crate) fn io(operation: &'static str, error: &io::Error) -> Self {
        CacheError::Io {
            operation,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Returns the [`std::io::ErrorKind`] if the error originated from the filesystem.
    pub fn io_error_kind(&self) -> Option<io::ErrorKind> {
        match self {
            CacheError::Io { kind, .. } => Some(*kind),
            _ => None
        }
    }
}

impl Display for CacheError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Io { operation, kind, message } =>
                write!(formatter, "[{}]: {} ({:?})", ErrorType::OperationError(operation), message, kind),
            CacheError::InvalidKey(error) =>
                write!(formatter, "{}", error),
            CacheError::Shutdown(operation) =>
                write!(formatter, "[{}]: {}", ErrorType::OperationError(operation), SHUTDOWN_MESSAGE),
        }
    }
}

/// Debug implementation for `CacheError`. Currently, both `Display` and `Debug` return the same message.
impl Debug for CacheError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl Error for CacheError {}

impl From<Errors> for CacheError {
    fn from(error: Errors) -> Self {
        CacheError::InvalidKey(error)
    }
}
