//! JSON-file settings store.

use crate::domain::ports::SettingsStore;
use crate::error::LinkLabError;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Settings persisted as a flat JSON object of booleans.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// a crash mid-write leaves the previous contents intact. A missing or empty
/// file reads as "no keys".
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Using FileSettings at {}", path.display());
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, bool>, LinkLabError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(LinkLabError::settings(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            LinkLabError::settings(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    fn store(&self, values: &BTreeMap<String, bool>) -> Result<(), LinkLabError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LinkLabError::settings(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let json = serde_json::to_string_pretty(values)
            .map_err(|e| LinkLabError::settings(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                LinkLabError::settings(format!("failed to write {}: {e}", self.path.display()))
            })
    }
}

impl SettingsStore for FileSettings {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, LinkLabError> {
        Ok(self.load()?.get(key).copied())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), LinkLabError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.load()?;
        values.insert(key.to_string(), value);
        self.store(&values)
    }
}
