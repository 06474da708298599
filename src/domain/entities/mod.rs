//! Core domain entities.
//!
//! - [`LinkData`] - Resolved (or unrecognized) link metadata
//! - [`NewLinkData`] - Input for building a resolved link
//! - [`DomainType`] - Classification tag carried by every link

pub mod link_data;

pub use link_data::{DomainType, LinkData, NewLinkData, Parameters};
