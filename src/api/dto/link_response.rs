//! DTO for the link lookup response.

use crate::domain::entities::{LinkData, NewLinkData, Parameters};
use crate::error::LinkLabError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_with::{DefaultOnError, serde_as};
use validator::Validate;

/// Timestamp pattern used by the LinkLab API (always UTC).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Body of `GET /links/{id}`.
///
/// Optional fields that arrive malformed are dropped rather than failing the
/// whole payload.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,

    #[validate(length(min = 1, message = "fullLink must not be empty"))]
    pub full_link: String,

    pub user_id: String,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub package_name: Option<String>,

    #[serde(default)]
    pub bundle_id: Option<String>,

    #[serde(default)]
    pub app_store_id: Option<String>,

    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default)]
    pub domain_type: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

impl LinkResponse {
    /// Parses and validates a response body into a [`LinkData`].
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::EmptyBody`] for a blank body and
    /// [`LinkLabError::Decode`] if the JSON is malformed or a required field is
    /// missing or empty.
    pub fn decode(body: &str) -> Result<LinkData, LinkLabError> {
        if body.trim().is_empty() {
            return Err(LinkLabError::EmptyBody);
        }

        let response: LinkResponse = serde_json::from_str(body)?;
        response
            .validate()
            .map_err(|e| LinkLabError::decode(e.to_string()))?;

        Ok(response.into())
    }
}

impl From<LinkResponse> for LinkData {
    fn from(r: LinkResponse) -> Self {
        LinkData::resolved(NewLinkData {
            id: r.id,
            full_link: r.full_link,
            user_id: r.user_id,
            created_at: r.created_at.as_deref().and_then(parse_timestamp),
            updated_at: r.updated_at.as_deref().and_then(parse_timestamp),
            package_name: r.package_name,
            bundle_id: r.bundle_id,
            app_store_id: r.app_store_id,
            domain: r.domain,
            domain_type: r.domain_type,
            parameters: r.parameters,
        })
    }
}

/// Parses an API timestamp; anything off-pattern is treated as absent.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
