//! LinkData entity describing the outcome of one resolution attempt.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Query-style parameters attached to a link.
pub type Parameters = BTreeMap<String, String>;

/// Classification tag carried by every [`LinkData`].
///
/// Serializes as its lowercase tag string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainType {
    /// Link hosted on the fixed LinkLab domain.
    LinkLab,
    /// Link hosted on a customer-owned domain.
    Custom,
    /// Link that could not be resolved; carries the input URI verbatim.
    Unrecognized,
    /// Server tag this client does not know yet, kept as sent.
    Other(String),
}

impl DomainType {
    /// Maps a server-provided tag onto a resolved domain type.
    ///
    /// A missing or blank tag is treated as `custom`; an unknown tag is kept in
    /// [`DomainType::Other`]. The server can never produce
    /// [`DomainType::Unrecognized`]: that variant is reserved for
    /// [`LinkData::unrecognized`], so a server `"unrecognized"` tag also maps
    /// to `custom`.
    pub fn from_server_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            Some("linklab") => Self::LinkLab,
            None | Some("") | Some("custom") | Some("unrecognized") => Self::Custom,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::LinkLab => "linklab",
            Self::Custom => "custom",
            Self::Unrecognized => "unrecognized",
            Self::Other(tag) => tag,
        }
    }
}

impl Serialize for DomainType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved metadata for a dynamic link.
///
/// Immutable once built. `domain_type == Unrecognized` exactly when `id` is
/// `None`; the only way to get such a value is [`LinkData::unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkData {
    id: Option<String>,
    full_link: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    user_id: Option<String>,
    package_name: Option<String>,
    bundle_id: Option<String>,
    app_store_id: Option<String>,
    domain: Option<String>,
    domain_type: DomainType,
    parameters: Option<Parameters>,
}

/// Input data for building a resolved [`LinkData`].
#[derive(Debug, Clone, Default)]
pub struct NewLinkData {
    pub id: String,
    pub full_link: String,
    pub user_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub package_name: Option<String>,
    pub bundle_id: Option<String>,
    pub app_store_id: Option<String>,
    pub domain: Option<String>,
    pub domain_type: Option<String>,
    pub parameters: Option<Parameters>,
}

impl LinkData {
    /// Builds a resolved link from server data.
    pub fn resolved(new: NewLinkData) -> Self {
        Self {
            id: Some(new.id),
            full_link: new.full_link,
            created_at: new.created_at,
            updated_at: new.updated_at,
            user_id: Some(new.user_id),
            package_name: new.package_name,
            bundle_id: new.bundle_id,
            app_store_id: new.app_store_id,
            domain: new.domain,
            domain_type: DomainType::from_server_tag(new.domain_type.as_deref()),
            parameters: new.parameters.filter(|p| !p.is_empty()),
        }
    }

    /// Builds the fail-open value for a link that could not be resolved.
    pub fn unrecognized(uri: impl Into<String>) -> Self {
        Self {
            id: None,
            full_link: uri.into(),
            created_at: None,
            updated_at: None,
            user_id: None,
            package_name: None,
            bundle_id: None,
            app_store_id: None,
            domain: None,
            domain_type: DomainType::Unrecognized,
            parameters: None,
        }
    }

    /// Returns a copy carrying `parameters`; an empty map is stored as `None`.
    pub fn with_parameters(&self, parameters: Option<Parameters>) -> Self {
        Self {
            parameters: parameters.filter(|p| !p.is_empty()),
            ..self.clone()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn full_link(&self) -> &str {
        &self.full_link
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    pub fn bundle_id(&self) -> Option<&str> {
        self.bundle_id.as_deref()
    }

    pub fn app_store_id(&self) -> Option<&str> {
        self.app_store_id.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn domain_type(&self) -> DomainType {
        self.domain_type.clone()
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }

    /// Returns true if this value is the fail-open fallback.
    pub fn is_unrecognized(&self) -> bool {
        self.domain_type == DomainType::Unrecognized
    }
}
