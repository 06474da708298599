//! Decides whether a URI belongs to the LinkLab service.

use crate::utils::link_uri::raw_host;
use std::iter;

/// Fixed domain that always belongs to the service.
pub const DEFAULT_DOMAIN: &str = "linklab.cc";

/// Host matcher over the default domain plus configured custom domains.
///
/// A host matches a domain when it equals it or is a subdomain of it
/// (`go.shop.com` matches `shop.com`, `evilshop.com` does not). Comparison is
/// case-sensitive on the host as written in the URI string; no IDN or case
/// folding is applied, so `https://LINKLAB.CC/x` is not a service link.
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    default_domain: String,
    custom_domains: Vec<String>,
}

impl DomainMatcher {
    /// Creates a matcher for [`DEFAULT_DOMAIN`] and the given custom domains.
    pub fn new<I, S>(custom_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_domain: DEFAULT_DOMAIN.to_string(),
            custom_domains: custom_domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the host of `uri` matches the default or a custom domain.
    pub fn belongs_to_service(&self, uri: &str) -> bool {
        raw_host(uri).is_some_and(|host| self.matches_host(host))
    }

    /// Host-level variant of [`Self::belongs_to_service`].
    pub fn matches_host(&self, host: &str) -> bool {
        iter::once(&self.default_domain)
            .chain(&self.custom_domains)
            .any(|domain| host_matches(host, domain))
    }

    pub fn custom_domains(&self) -> &[String] {
        &self.custom_domains
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
