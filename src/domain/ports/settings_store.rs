//! Port for durable key-value settings.

use crate::error::LinkLabError;

/// Durable boolean settings scoped to one app installation.
///
/// # Implementations
///
/// - [`crate::infrastructure::settings::MemorySettings`] - process-local map
/// - [`crate::infrastructure::settings::FileSettings`] - JSON file on disk
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore: Send + Sync {
    /// Reads a flag. `Ok(None)` means the key was never written.
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::Settings`] if the backing store cannot be read.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, LinkLabError>;

    /// Writes a flag and makes it durable before returning.
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::Settings`] if the value could not be persisted.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), LinkLabError>;
}
