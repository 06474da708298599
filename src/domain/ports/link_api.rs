//! Port for the remote link lookup.

use crate::error::LinkLabError;
use async_trait::async_trait;

/// Remote lookup of a short link.
///
/// # Implementations
///
/// - [`crate::api::HttpLinkApi`] - `reqwest` transport against the LinkLab API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkApi: Send + Sync {
    /// Fetches the raw JSON body describing `link_id` on `domain`.
    ///
    /// Called at most once per resolution request; implementations must not
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::Transport`] if the request could not be sent.
    /// Returns [`LinkLabError::Status`] for any non-success status.
    async fn fetch_link(&self, link_id: &str, domain: &str) -> Result<String, LinkLabError>;
}
