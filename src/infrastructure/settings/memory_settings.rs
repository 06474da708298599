//! In-memory settings store.

use crate::domain::ports::SettingsStore;
use crate::error::LinkLabError;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// A settings store that lives only as long as the process.
///
/// Flags written here do not survive a restart, so install attribution may
/// run again on the next launch.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, bool>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        debug!("Using MemorySettings (flags are not persisted)");
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, LinkLabError> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), LinkLabError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}
