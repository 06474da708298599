//! Port traits for the collaborators the resolver depends on.
//!
//! These traits abstract the HTTP transport, durable settings and the
//! platform install-referrer provider. Implementations live in
//! `crate::api` and `crate::infrastructure`; mock implementations are
//! auto-generated via `mockall` for testing.
//!
//! - [`LinkApi`] - Remote link lookup
//! - [`SettingsStore`] - Persisted install-referrer flag
//! - [`InstallReferrerProvider`] - Install attribution payload source

mod link_api;
mod referrer_provider;
mod settings_store;

pub use link_api::LinkApi;
pub use referrer_provider::InstallReferrerProvider;
pub use settings_store::SettingsStore;

#[cfg(test)]
pub use link_api::MockLinkApi;
#[cfg(test)]
pub use referrer_provider::MockInstallReferrerProvider;
#[cfg(test)]
pub use settings_store::MockSettingsStore;
