//! Infrastructure layer for platform integrations.
//!
//! This layer implements port traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`settings`] - Persisted flag storage (in-memory and JSON file)
//! - [`referrer`] - Install-referrer providers

pub mod referrer;
pub mod settings;
