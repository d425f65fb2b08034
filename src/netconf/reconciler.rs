//! Reconciliation of the runtime's on-disk network definition files.
//!
//! The runtime tool re-reads its network definition on each container
//! launch, so the file must stay readable at all times: updates are
//! whole-file rewrites, performed only when the desired configuration
//! actually differs from what is already persisted.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::definition::NetworkDefinition;
use crate::configuration::types::NetworkConfig;
use crate::error_handling::types::NetworkError;
use crate::fsutil;

fn definition_file_name(name: &str) -> String {
    format!("50-{}.conf", name)
}

/// One network definition file and its reconciliation state.
///
/// The in-memory definition starts out empty, is filled by [`load`], is
/// replaced by [`update`] only on a real change, and is written back by
/// [`save`] only while dirty. Use [`with_network`] for the usual
/// load-mutate-persist cycle.
///
/// [`load`]: NetworkFile::load
/// [`update`]: NetworkFile::update
/// [`save`]: NetworkFile::save
pub struct NetworkFile {
    name: String,
    path: PathBuf,
    data: Option<NetworkDefinition>,
    dirty: bool,
}

impl NetworkFile {
    pub fn new(dir: &Path, name: &str) -> Self {
        let path = dir.join(definition_file_name(name));
        debug!("network {}: definition file {}", name, path.display());
        NetworkFile {
            name: name.to_string(),
            path,
            data: None,
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn definition(&self) -> Option<&NetworkDefinition> {
        self.data.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Loads the persisted definition. A missing or unreadable file is not
    /// an error: the in-memory definition keeps its prior value.
    pub fn load(&mut self) {
        match fsutil::read_file(&self.path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(definition) => self.data = Some(definition),
                Err(e) => debug!(
                    "network {}: cannot parse {}, ignored: {}",
                    self.name,
                    self.path.display(),
                    e
                ),
            },
            Err(e) => debug!(
                "network {}: cannot load {}, ignored: {}",
                self.name,
                self.path.display(),
                e
            ),
        }
    }

    /// Replaces the in-memory definition and marks it dirty, but only when
    /// `desired` differs structurally from what is already held.
    pub fn update(&mut self, desired: &NetworkConfig) {
        let candidate = NetworkDefinition::from_desired(&self.name, desired);
        if self.data.as_ref() != Some(&candidate) {
            debug!(
                "network {}: using bridge {} for subnet {}",
                self.name, candidate.bridge, candidate.ipam.subnet
            );
            self.data = Some(candidate);
            self.dirty = true;
        }
    }

    /// Persists the in-memory definition as indented, key-sorted JSON.
    ///
    /// A clean definition skips the write unless `force` is set.
    pub fn save(&mut self, force: bool) -> Result<(), NetworkError> {
        if !self.dirty && !force {
            info!("network {}: no update needed, save skipped", self.name);
            return Ok(());
        }
        let definition = match &self.data {
            Some(definition) => definition,
            None => {
                info!("network {}: nothing to save", self.name);
                return Ok(());
            }
        };
        let text = serde_json::to_string_pretty(definition)
            .map_err(|e| NetworkError::SerializeFailed(e.to_string()))?;
        fs::write(&self.path, text)?;
        self.dirty = false;
        info!("network {}: definition saved to {}", self.name, self.path.display());
        Ok(())
    }

    /// Best-effort removal of the definition file.
    pub fn clear(&self) {
        if let Err(e) = fsutil::rm_file(&self.path) {
            warn!(
                "network {}: failed to remove {}: {}",
                self.name,
                self.path.display(),
                e
            );
        }
    }
}

/// Scoped reconciliation: load on entry, run `op`, persist only when `op`
/// succeeded. An error from `op` leaves the on-disk file untouched.
pub fn with_network<T, F>(dir: &Path, name: &str, op: F) -> Result<T, NetworkError>
where
    F: FnOnce(&mut NetworkFile) -> Result<T, NetworkError>,
{
    let mut net = NetworkFile::new(dir, name);
    net.load();
    let value = op(&mut net)?;
    net.save(false)?;
    Ok(value)
}
