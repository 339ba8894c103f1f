use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};
use parking_lot::RwLock;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};

use crate::cache::errors::CacheError;
use crate::cache::key::POLICY_SUFFIX_SEPARATOR;
use crate::cache::types::IsPersistent;

/// Name of the file in the root directory that records the current working directory.
pub(crate) const MARKER_FILE_NAME: &str = "directory.cache";

const POLICY_FILE_SUFFIX: &str = "policy";
const DIRECTORY_NAME_LENGTH: usize = 12;

/// CacheDirectoryManager owns the root path and the current working directory under it.
///
/// All the entries live in the current working directory. Assigning a new working directory logically
/// invalidates the whole cache without deleting anything; the superseded directories stay on disk until
/// the root is removed.
///
/// In persistent mode the name of the current working directory is written to the marker file
/// [`MARKER_FILE_NAME`] so that it can be recovered after a restart. The marker is advisory:
/// the name is written first and the directory is created afterwards, the two steps are not atomic,
/// and failing to read or write the marker only means starting from an empty working directory.
pub(crate) struct CacheDirectoryManager {
    root: PathBuf,
    persistent: IsPersistent,
    current: RwLock<PathBuf>,
}

impl CacheDirectoryManager {
    /// Recovers the working directory from the marker file in persistent mode, or assigns a fresh one.
    /// After a successful return the current working directory exists on disk.
    pub(crate) fn initialize(root: PathBuf, persistent: IsPersistent) -> Result<Self, CacheError> {
        let recovered = if persistent { recover_working_directory(&root) } else { None };
        let current = match recovered {
            Some(directory) => {
                info!("Recovered the working directory {:?}", directory);
                directory
            }
            None => create_working_directory(&root, persistent)?,
        };
        Ok(CacheDirectoryManager { root, persistent, current: RwLock::new(current) })
    }

    /// Switches to a freshly created working directory. Entries of the previous one become unreachable.
    pub(crate) fn assign_cache_directory(&self) -> Result<PathBuf, CacheError> {
        let directory = create_working_directory(&self.root, self.persistent)?;
        *self.current.write() = directory.clone();
        info!("Assigned the working directory {:?}", directory);
        Ok(directory)
    }

    pub(crate) fn current_directory(&self) -> PathBuf {
        self.current.read().clone()
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn entry_path(&self, key: &str) -> PathBuf {
        self.current.read().join(key)
    }

    pub(crate) fn policy_path(&self, key: &str) -> PathBuf {
        self.current.read().join(format!("{}{}{}", key, POLICY_SUFFIX_SEPARATOR, POLICY_FILE_SUFFIX))
    }

    /// Deletes the root recursively, destroying every working directory ever assigned under it.
    pub(crate) fn remove_root(&self) -> Result<(), CacheError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                info!("Removed the cache root {:?}", self.root);
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CacheError::io("destroy", &error)),
        }
    }
}

fn create_working_directory(root: &Path, persistent: IsPersistent) -> Result<PathBuf, CacheError> {
    let name = random_directory_name();
    if persistent {
        if let Err(error) = write_marker(root, &name) {
            warn!("could not persist the working directory {:?} in the marker file, error: {}", name, error);
        }
    }
    let directory = root.join(&name);
    fs::create_dir_all(&directory).map_err(|error| CacheError::io("assign_cache_directory", &error))?;
    Ok(directory)
}

fn write_marker(root: &Path, name: &str) -> io::Result<()> {
    fs::create_dir_all(root)?;
    fs::write(root.join(MARKER_FILE_NAME), name)
}

fn recover_working_directory(root: &Path) -> Option<PathBuf> {
    let marker = root.join(MARKER_FILE_NAME);
    let name = match fs::read_to_string(&marker) {
        Ok(name) => name,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!("no marker file at {:?}", marker);
            return None;
        }
        Err(error) => {
            warn!("could not read the marker file {:?}, error: {}", marker, error);
            return None;
        }
    };

    let name = name.trim();
    if !is_single_component(name) {
        warn!("ignoring the marker file {:?} with an unusable directory name {:?}", marker, name);
        return None;
    }
    let directory = root.join(name);
    if !directory.is_dir() {
        debug!("working directory {:?} named by the marker file does not exist", directory);
        return None;
    }
    Some(directory)
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

fn random_directory_name() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DIRECTORY_NAME_LENGTH)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}
