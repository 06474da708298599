//! Utility functions for URI classification and payload decoding.
//!
//! This module provides helper functions used across the library:
//!
//! - [`domain_matcher`] - Service domain matching
//! - [`link_uri`] - Link id, host and query parameter extraction
//! - [`referrer_payload`] - Install-referrer payload decoding

pub mod domain_matcher;
pub mod link_uri;
pub mod referrer_payload;

pub use domain_matcher::{DEFAULT_DOMAIN, DomainMatcher};
pub use referrer_payload::{ReferrerPayload, decode_referrer, encode_referrer};
