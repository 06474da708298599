//! `reqwest` transport for the LinkLab link lookup endpoint.

use crate::config::Config;
use crate::domain::ports::LinkApi;
use crate::error::LinkLabError;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// HTTP implementation of [`LinkApi`].
///
/// Issues `GET {base}/links/{link_id}?domain={domain}` with the configured
/// timeout and only the headers `reqwest` sends by default. No retries; a
/// failed request is reported once.
#[derive(Debug, Clone)]
pub struct HttpLinkApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpLinkApi {
    /// Builds the transport from `config.api_base_url` and `config.timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::InvalidArgument`] if the base URL cannot be parsed
    /// or cannot carry path segments, and [`LinkLabError::Transport`] if the
    /// HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, LinkLabError> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            LinkLabError::invalid_argument(format!("invalid API base URL: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(LinkLabError::invalid_argument(
                "API base URL cannot carry a path",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LinkLabError::transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Builds the lookup URL for `link_id` on `domain`.
    pub fn lookup_url(&self, link_id: &str, domain: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["links", link_id]);
        }
        url.query_pairs_mut().clear().append_pair("domain", domain);
        url
    }
}

#[async_trait]
impl LinkApi for HttpLinkApi {
    async fn fetch_link(&self, link_id: &str, domain: &str) -> Result<String, LinkLabError> {
        let url = self.lookup_url(link_id, domain);
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        debug!("Lookup {} returned {} bytes", link_id, body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpLinkApi {
        HttpLinkApi::new(&Config::default().with_api_base_url(base)).unwrap()
    }

    #[test]
    fn test_lookup_url() {
        let url = api("https://linklab.cc/api").lookup_url("abcd1234", "linklab.cc");
        assert_eq!(
            url.as_str(),
            "https://linklab.cc/api/links/abcd1234?domain=linklab.cc"
        );
    }

    #[test]
    fn test_lookup_url_trailing_slash_base() {
        let url = api("https://linklab.cc/api/").lookup_url("abcd1234", "go.shop.com");
        assert_eq!(
            url.as_str(),
            "https://linklab.cc/api/links/abcd1234?domain=go.shop.com"
        );
    }

    #[test]
    fn test_lookup_url_encodes_segment() {
        let url = api("https://linklab.cc").lookup_url("a b", "linklab.cc");
        assert_eq!(url.as_str(), "https://linklab.cc/links/a%20b?domain=linklab.cc");
    }

    #[test]
    fn test_lookup_url_encodes_decoded_id_once() {
        let url = api("https://linklab.cc/api").lookup_url("café", "linklab.cc");
        assert_eq!(
            url.as_str(),
            "https://linklab.cc/api/links/caf%C3%A9?domain=linklab.cc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config::default().with_api_base_url("not a url");
        assert!(matches!(
            HttpLinkApi::new(&config),
            Err(LinkLabError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_base_url_without_path() {
        let config = Config::default().with_api_base_url("mailto:api@linklab.cc");
        assert!(HttpLinkApi::new(&config).is_err());
    }
}
