//! Business logic services for the application layer.

pub mod attribution_service;
pub mod resolution_service;

pub use attribution_service::{INSTALL_REFERRER_CHECKED_KEY, InstallAttribution};
pub use resolution_service::LinkResolver;
