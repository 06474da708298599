//! Data transfer objects for the LinkLab HTTP API.
//!
//! DTOs use Serde for JSON deserialization and validator for required-field
//! checks before conversion into domain entities.

pub mod link_response;

pub use link_response::LinkResponse;
