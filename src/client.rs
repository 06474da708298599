//! Composition root wiring the resolver to its collaborators.

use crate::api::HttpLinkApi;
use crate::application::services::{InstallAttribution, LinkResolver};
use crate::config::Config;
use crate::domain::ports::{InstallReferrerProvider, LinkApi, SettingsStore};
use crate::domain::{LinkListener, LinkResult, Resolution};
use crate::infrastructure::settings::{FileSettings, MemorySettings};
use crate::utils::DomainMatcher;
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// One LinkLab session, owned by the host.
///
/// Build exactly one per host session with [`LinkLab::builder`] and share it;
/// there is no global instance. The background tasks live until the last
/// clone of the internal resolver is dropped.
pub struct LinkLab {
    config: Config,
    resolver: LinkResolver,
    attribution: Option<Arc<InstallAttribution>>,
    attribution_task: Mutex<Option<JoinHandle<Option<LinkResult>>>>,
}

impl LinkLab {
    pub fn builder(config: Config) -> LinkLabBuilder {
        LinkLabBuilder::new(config)
    }

    /// See [`LinkResolver::classify_and_dispatch`].
    pub fn classify_and_dispatch(&self, uri: Option<&str>) -> bool {
        self.resolver.classify_and_dispatch(uri)
    }

    /// See [`LinkResolver::resolve`].
    pub fn resolve(&self, uri: &str) -> Resolution {
        self.resolver.resolve(uri)
    }

    pub fn add_listener(&self, listener: Arc<dyn LinkListener>) -> bool {
        self.resolver.add_listener(listener)
    }

    pub fn remove_listener(&self, listener: &Arc<dyn LinkListener>) -> bool {
        self.resolver.remove_listener(listener)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    pub fn install_attribution(&self) -> Option<&Arc<InstallAttribution>> {
        self.attribution.as_ref()
    }

    /// Waits for the attribution check started by [`LinkLabBuilder::build`].
    ///
    /// Returns `None` if no check was started, it ended without a link, or it
    /// was already awaited.
    pub async fn wait_for_attribution(&self) -> Option<LinkResult> {
        let task = self
            .attribution_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;

        match task.await {
            Ok(result) => result,
            Err(e) => {
                warn!("Install attribution task failed: {}", e);
                None
            }
        }
    }
}

/// Builder for [`LinkLab`].
///
/// Collaborators default to [`HttpLinkApi`] and, for settings, a
/// [`FileSettings`] at `config.settings_path` or [`MemorySettings`] when no
/// path is set. Install attribution only runs when a referrer provider is
/// supplied.
pub struct LinkLabBuilder {
    config: Config,
    api: Option<Arc<dyn LinkApi>>,
    settings: Option<Arc<dyn SettingsStore>>,
    referrer: Option<Arc<dyn InstallReferrerProvider>>,
    listeners: Vec<Arc<dyn LinkListener>>,
}

impl LinkLabBuilder {
    fn new(config: Config) -> Self {
        Self {
            config,
            api: None,
            settings: None,
            referrer: None,
            listeners: Vec::new(),
        }
    }

    pub fn api(mut self, api: Arc<dyn LinkApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn referrer_provider(mut self, provider: Arc<dyn InstallReferrerProvider>) -> Self {
        self.referrer = Some(provider);
        self
    }

    /// Registers a listener before any background work starts, so it also
    /// sees the install attribution result.
    pub fn listener(mut self, listener: Arc<dyn LinkListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Validates the configuration and starts the background tasks.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the default HTTP
    /// transport cannot be built.
    pub fn build(self) -> Result<LinkLab> {
        self.config.validate().context("Invalid LinkLab configuration")?;

        let api: Arc<dyn LinkApi> = match self.api {
            Some(api) => api,
            None => Arc::new(
                HttpLinkApi::new(&self.config).context("Failed to build LinkLab HTTP client")?,
            ),
        };

        let matcher = DomainMatcher::new(self.config.custom_domains.iter().cloned());
        let resolver = LinkResolver::start(api, matcher);
        for listener in self.listeners {
            resolver.add_listener(listener);
        }

        let (attribution, attribution_task) = match self.referrer {
            Some(provider) => {
                let settings = self
                    .settings
                    .unwrap_or_else(|| default_settings(&self.config));
                let attribution = Arc::new(InstallAttribution::new(
                    resolver.clone(),
                    provider,
                    settings,
                ));

                let task = if attribution.is_checked() {
                    None
                } else {
                    let runner = attribution.clone();
                    Some(tokio::spawn(async move { runner.run_once().await }))
                };
                (Some(attribution), task)
            }
            None => (None, None),
        };

        info!(
            "LinkLab started ({} custom domain(s), attribution {})",
            self.config.custom_domains.len(),
            if attribution_task.is_some() { "pending" } else { "off" }
        );

        Ok(LinkLab {
            config: self.config,
            resolver,
            attribution,
            attribution_task: Mutex::new(attribution_task),
        })
    }
}

fn default_settings(config: &Config) -> Arc<dyn SettingsStore> {
    match &config.settings_path {
        Some(path) => Arc::new(FileSettings::new(path)),
        None => Arc::new(MemorySettings::new()),
    }
}
