//! Install-referrer attribution.

use crate::application::services::LinkResolver;
use crate::domain::LinkResult;
use crate::domain::ports::{InstallReferrerProvider, SettingsStore};
use crate::utils::decode_referrer;
use metrics::counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Settings key for the "install referrer already checked" flag.
pub const INSTALL_REFERRER_CHECKED_KEY: &str = "linklab.install_referrer_checked";

/// One-shot attribution of the app install to a LinkLab link.
///
/// The persisted flag is read once on construction and written before the
/// provider is contacted, so a crash mid-check never causes a second check.
/// Failures at any step end silently: there is no fallback link to deliver.
pub struct InstallAttribution {
    resolver: LinkResolver,
    provider: Arc<dyn InstallReferrerProvider>,
    settings: Arc<dyn SettingsStore>,
    checked: AtomicBool,
}

impl InstallAttribution {
    /// Creates the adapter and reads the persisted flag.
    ///
    /// An unreadable flag counts as "not checked".
    pub fn new(
        resolver: LinkResolver,
        provider: Arc<dyn InstallReferrerProvider>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        let checked = match settings.get_bool(INSTALL_REFERRER_CHECKED_KEY) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!("Failed to read install referrer flag: {}", e);
                false
            }
        };

        Self {
            resolver,
            provider,
            settings,
            checked: AtomicBool::new(checked),
        }
    }

    /// Returns true once the check has run (in this or an earlier process).
    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::SeqCst)
    }

    /// Runs the attribution check if it has never run.
    ///
    /// # Returns
    ///
    /// - `Some(result)` after listeners were notified of the attributed link
    /// - `None` if the check already ran or ended without a link
    pub async fn run_once(&self) -> Option<LinkResult> {
        if self.checked.swap(true, Ordering::SeqCst) {
            debug!("Install referrer already checked");
            return None;
        }

        if let Err(e) = self.settings.set_bool(INSTALL_REFERRER_CHECKED_KEY, true) {
            warn!("Failed to persist install referrer flag, skipping check: {}", e);
            counter!("linklab_attribution_total", "outcome" => "flag_write_failed").increment(1);
            return None;
        }

        if let Err(e) = self.provider.connect().await {
            debug!("Install referrer provider unavailable: {}", e);
            counter!("linklab_attribution_total", "outcome" => "unavailable").increment(1);
            self.provider.disconnect().await;
            return None;
        }

        let outcome = self.attribute().await;
        self.provider.disconnect().await;
        outcome
    }

    async fn attribute(&self) -> Option<LinkResult> {
        let raw = match self.provider.install_referrer().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read install referrer: {}", e);
                counter!("linklab_attribution_total", "outcome" => "read_failed").increment(1);
                return None;
            }
        };

        let payload = match decode_referrer(&raw) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("Install referrer carries no LinkLab link");
                counter!("linklab_attribution_total", "outcome" => "organic").increment(1);
                return None;
            }
            Err(e) => {
                debug!("Install referrer is not decodable: {}", e);
                counter!("linklab_attribution_total", "outcome" => "decode_failed").increment(1);
                return None;
            }
        };

        info!(
            "Install attributed to link {} on {}",
            payload.link_id, payload.domain
        );
        let result = self
            .resolver
            .resolve_attribution(&payload.link_id, &payload.domain)
            .wait()
            .await;
        if result.is_some() {
            counter!("linklab_attribution_total", "outcome" => "resolved").increment(1);
        }
        result
    }
}
