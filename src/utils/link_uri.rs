//! Helpers for pulling link identifiers and query parameters out of URIs.

use crate::domain::entities::Parameters;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::{Url, form_urlencoded};

/// Returns the last non-empty path segment, percent-decoded, used as the link
/// identifier.
///
/// `https://linklab.cc/abcd1234/` yields `abcd1234` and
/// `https://linklab.cc/caf%C3%A9` yields `café`. A bare host, or a segment that
/// does not decode to UTF-8, yields `None`.
pub fn link_id(uri: &Url) -> Option<Cow<'_, str>> {
    let segment = uri.path_segments()?.rfind(|segment| !segment.is_empty())?;
    percent_decode_str(segment).decode_utf8().ok()
}

/// Returns the host exactly as written in `uri`, without case or IDNA mapping.
///
/// Userinfo and port are stripped; IPv6 literals keep their brackets. Returns
/// `None` when `uri` has no `scheme://` authority.
pub fn raw_host(uri: &str) -> Option<&str> {
    let (_, rest) = uri.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let host = if host_port.starts_with('[') {
        host_port
            .find(']')
            .map_or(host_port, |end| &host_port[..=end])
    } else {
        host_port.split(':').next().unwrap_or_default()
    };
    Some(host).filter(|host| !host.is_empty())
}

/// Returns the URI host when present and non-empty.
pub fn link_domain(uri: &Url) -> Option<&str> {
    uri.host_str().filter(|host| !host.is_empty())
}

/// Parses the query string of `uri` into a key/value map.
///
/// Works on the raw string so that URIs the parser rejects still yield their
/// parameters. Later duplicates win; empty keys are skipped.
pub fn query_parameters(uri: &str) -> Parameters {
    let Some((_, rest)) = uri.split_once('?') else {
        return Parameters::new();
    };
    let query = rest.split('#').next().unwrap_or_default();

    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Merges the query parameters of `uri` into `existing`.
///
/// URI values win on key collision. Returns `None` when both sources are empty.
pub fn merge_query_parameters(existing: Option<&Parameters>, uri: &str) -> Option<Parameters> {
    let mut merged = existing.cloned().unwrap_or_default();
    merged.extend(query_parameters(uri));

    if merged.is_empty() {
        None
    } else {
        Some(merged)
    }
}
