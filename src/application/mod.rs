//! Application layer: resolution engine, attribution and dispatch.
//!
//! This layer orchestrates the domain by coordinating the port traits, the
//! background lookup worker and the listener dispatcher.
//!
//! # Available Services
//!
//! - [`services::LinkResolver`] - Classification, lookup and fail-open dispatch
//! - [`services::InstallAttribution`] - One-shot install-referrer attribution
//!
//! # Execution Contexts
//!
//! - [`lookup_worker::run_lookup_worker`] - Background task, one lookup at a time
//! - [`dispatcher::Dispatcher`] - Callback task that notifies listeners in order

pub mod dispatcher;
pub mod lookup_worker;
pub mod services;

pub use dispatcher::{Dispatcher, ListenerRegistry};
pub use lookup_worker::run_lookup_worker;
