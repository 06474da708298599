//! Port for the platform install-referrer provider.

use crate::error::LinkLabError;
use async_trait::async_trait;

/// Connection-oriented access to the install referral payload.
///
/// Callers always pair a [`connect`](Self::connect) with a
/// [`disconnect`](Self::disconnect), whatever the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstallReferrerProvider: Send + Sync {
    /// Opens the provider connection.
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::Referrer`] when the provider reports a non-OK
    /// status (unsupported, unavailable, developer error).
    async fn connect(&self) -> Result<(), LinkLabError>;

    /// Returns the raw (base64) referrer string.
    ///
    /// # Errors
    ///
    /// Returns [`LinkLabError::Referrer`] if the payload cannot be read.
    async fn install_referrer(&self) -> Result<String, LinkLabError>;

    /// Releases the provider connection.
    async fn disconnect(&self);
}
