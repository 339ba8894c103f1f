use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::warn;

use crate::cache::errors::CacheError;
use crate::cache::policy::cache_policy::CachePolicy;
use crate::cache::policy::serializer::PolicySerializer;

/// PolicyStore reads and writes the policy file of a key.
/// Reading never fails: any problem is logged and reported as [`CachePolicy::Invalid`].
pub(crate) struct PolicyStore {
    serializer: Box<dyn PolicySerializer>,
}

impl PolicyStore {
    pub(crate) fn new(serializer: Box<dyn PolicySerializer>) -> Self {
        PolicyStore { serializer }
    }

    pub(crate) fn get(&self, path: &Path) -> CachePolicy {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return CachePolicy::Invalid,
            Err(error) => {
                warn!("could not read the policy file {:?}, error: {}", path, error);
                return CachePolicy::Invalid;
            }
        };
        match self.serializer.deserialize(&text) {
            Some(policy) => policy,
            None => {
                warn!("could not parse the policy file {:?}", path);
                CachePolicy::Invalid
            }
        }
    }

    /// Replaces the policy file with the serialized policy. Concurrent writers of the same key race,
    /// the last write wins.
    pub(crate) fn set(&self, path: &Path, policy: &CachePolicy) -> Result<(), CacheError> {
        let text = self.serializer.serialize(policy)?;
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
            file.write_all(text.as_bytes())?;
            file.flush()
        };
        write().map_err(|error| CacheError::io("set_cache_policy", &error))
    }

    /// Deletes only the policy file, a missing file is not an error.
    pub(crate) fn remove(&self, path: &Path) -> Result<(), CacheError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CacheError::io("remove", &error)),
        }
    }
}
