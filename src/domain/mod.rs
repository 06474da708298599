//! Domain layer containing the link model and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - [`LinkData`] and its classification tag
//! - [`link_result`] - Callback payload and [`LinkListener`] trait
//! - [`lookup_job`] - Messages for the background lookup worker
//! - [`processed_ids`] - Deduplication set for resolved links
//! - [`ports`] - Transport, settings and referrer-provider traits
//!
//! # Resolution Flow
//!
//! 1. Host hands a URI to [`crate::application::services::LinkResolver`]
//! 2. A [`lookup_job::LookupJob`] is queued for the background worker
//! 3. [`crate::application::run_lookup_worker`] calls [`ports::LinkApi`] once
//! 4. The normalized [`LinkResult`] is handed to the dispatcher task

pub mod entities;
pub mod link_result;
pub mod lookup_job;
pub mod ports;
pub mod processed_ids;

pub use entities::{DomainType, LinkData, NewLinkData, Parameters};
pub use link_result::{LinkListener, LinkResult};
pub use lookup_job::{LookupJob, LookupOrigin, LookupRequest, Resolution};
pub use processed_ids::ProcessedIds;
