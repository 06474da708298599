//! # LinkLab
//!
//! Client library that resolves LinkLab dynamic links into destination URIs
//! and link metadata, and attributes app installs to the link that led to them.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link model, lookup jobs and collaborator ports
//! - **Application Layer** ([`application`]) - Resolution engine, dispatcher and install attribution
//! - **Infrastructure Layer** ([`infrastructure`]) - Settings stores and referrer providers
//! - **API Layer** ([`api`]) - HTTP client and response DTOs for the LinkLab API
//!
//! ## Features
//!
//! - Classification of incoming URIs against the LinkLab domain and custom domains
//! - Background lookups delivered to listeners in request order
//! - Fail-open fallback for links the service cannot resolve
//! - One-shot install attribution from a base64 install referrer
//!
//! ## Quick Start
//!
//! ```no_run
//! use linklab::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default().with_custom_domains(["go.example.com"]);
//! let linklab = LinkLab::builder(config)
//!     .listener(Arc::new(|result: &LinkResult| println!("{:?}", result)))
//!     .build()?;
//!
//! if linklab.classify_and_dispatch(Some("https://linklab.cc/abcd1234")) {
//!     // the listener will be called from the dispatcher task
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Configuration can be built in code or loaded from environment variables via
//! [`config::Config::from_env`]. See the [`config`] module for available options.

pub mod api;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;
pub mod utils;

pub use client::{LinkLab, LinkLabBuilder};
pub use config::Config;
pub use domain::{LinkData, LinkListener, LinkResult, Resolution};
pub use error::LinkLabError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::client::{LinkLab, LinkLabBuilder};
    pub use crate::config::Config;
    pub use crate::domain::entities::{DomainType, LinkData, Parameters};
    pub use crate::domain::ports::{InstallReferrerProvider, LinkApi, SettingsStore};
    pub use crate::domain::{LinkListener, LinkResult, Resolution};
    pub use crate::error::LinkLabError;
}
