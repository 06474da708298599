//! Decoding of the install-referrer attribution payload.
//!
//! The provider hands out a base64 string that decodes to an `&`-joined
//! `key=value` list, e.g. `linklab_id=xyz&domain=linklab.cc`.

use crate::error::LinkLabError;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use url::form_urlencoded;

const LINK_ID_KEY: &str = "linklab_id";
const DOMAIN_KEY: &str = "domain";

/// Standard alphabet, padding optional.
const REFERRER_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Link reference recovered from an install referrer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferrerPayload {
    pub link_id: String,
    pub domain: String,
}

/// Decodes a raw referrer string.
///
/// # Returns
///
/// - `Ok(Some(payload))` when both `linklab_id` and `domain` are present and non-empty
/// - `Ok(None)` when the payload decodes but does not reference a link
///
/// # Errors
///
/// Returns [`LinkLabError::Referrer`] if the string is not valid base64 or the
/// decoded bytes are not UTF-8.
pub fn decode_referrer(raw: &str) -> Result<Option<ReferrerPayload>, LinkLabError> {
    let bytes = REFERRER_ENGINE
        .decode(raw.trim())
        .map_err(|e| LinkLabError::referrer(format!("invalid base64: {e}")))?;
    let decoded = String::from_utf8(bytes)
        .map_err(|e| LinkLabError::referrer(format!("invalid utf-8: {e}")))?;

    let mut link_id = None;
    let mut domain = None;
    for (key, value) in form_urlencoded::parse(decoded.as_bytes()) {
        match key.as_ref() {
            LINK_ID_KEY => link_id = Some(value.into_owned()),
            DOMAIN_KEY => domain = Some(value.into_owned()),
            _ => {}
        }
    }

    match (link_id, domain) {
        (Some(link_id), Some(domain)) if !link_id.is_empty() && !domain.is_empty() => {
            Ok(Some(ReferrerPayload { link_id, domain }))
        }
        _ => Ok(None),
    }
}

/// Encodes a payload the way attribution providers deliver it.
///
/// Used by hosts and tests that feed a fixed referrer.
pub fn encode_referrer(link_id: &str, domain: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(LINK_ID_KEY, link_id)
        .append_pair(DOMAIN_KEY, domain)
        .finish();
    base64::engine::general_purpose::STANDARD.encode(query)
}
