//! Settings storage for the install-referrer flag.
//!
//! Provides two [`crate::domain::ports::SettingsStore`] implementations:
//! - [`FileSettings`] - JSON file that survives process restarts
//! - [`MemorySettings`] - Process-local map for tests and ephemeral hosts

mod file_settings;
mod memory_settings;

pub use file_settings::FileSettings;
pub use memory_settings::MemorySettings;
