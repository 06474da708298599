//! LinkLab HTTP API client.
//!
//! - [`client`] - `reqwest` implementation of [`crate::domain::ports::LinkApi`]
//! - [`dto`] - Response payloads

pub mod client;
pub mod dto;

pub use client::HttpLinkApi;
