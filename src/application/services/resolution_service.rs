//! Link resolution entry points.

use crate::application::dispatcher::{Dispatcher, ListenerRegistry};
use crate::application::lookup_worker::{fallback_link, run_lookup_worker};
use crate::domain::ports::LinkApi;
use crate::domain::{
    LinkListener, LinkResult, LookupJob, LookupOrigin, LookupRequest, ProcessedIds, Resolution,
};
use crate::error::LinkLabError;
use crate::utils::DomainMatcher;
use crate::utils::link_uri::{link_domain, link_id};
use metrics::counter;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use url::Url;

/// Resolves dynamic links and fans the results out to listeners.
///
/// Calls never block: work is queued for a background lookup task and results
/// arrive on the dispatcher task. Cloning is cheap and every clone drives the
/// same queue, listeners and deduplication set.
///
/// # Failure Policy
///
/// Link handling is fail-open. A foreign URI, a URI without a link id, a
/// transport error, a non-success status or an undecodable payload all yield
/// [`LinkResult::Resolved`] carrying an unrecognized [`crate::domain::LinkData`]
/// with the original URI. Only caller misuse (see [`Self::resolve`]) produces
/// [`LinkResult::Failed`].
#[derive(Clone)]
pub struct LinkResolver {
    matcher: DomainMatcher,
    registry: Arc<ListenerRegistry>,
    jobs: mpsc::UnboundedSender<LookupJob>,
}

impl LinkResolver {
    /// Starts the lookup worker and dispatcher tasks.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(api: Arc<dyn LinkApi>, matcher: DomainMatcher) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        let dispatcher = Dispatcher::spawn(registry.clone());
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_lookup_worker(
            rx,
            api,
            Arc::new(ProcessedIds::new()),
            dispatcher,
        ));

        Self {
            matcher,
            registry,
            jobs,
        }
    }

    /// Registers a listener; returns false if it was already registered.
    pub fn add_listener(&self, listener: Arc<dyn LinkListener>) -> bool {
        self.registry.add(listener)
    }

    /// Unregisters a listener; returns false if it was not registered.
    pub fn remove_listener(&self, listener: &Arc<dyn LinkListener>) -> bool {
        self.registry.remove(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    pub fn matcher(&self) -> &DomainMatcher {
        &self.matcher
    }

    /// Handles a URI delivered by the platform (app open, incoming intent).
    ///
    /// Returns false only when `uri` is `None`. A URI outside the service
    /// domains is dispatched straight away as an unrecognized link so the host
    /// can run its own deep-link handling from the same callback.
    pub fn classify_and_dispatch(&self, uri: Option<&str>) -> bool {
        let Some(uri) = uri else {
            return false;
        };

        match Url::parse(uri) {
            Ok(url) if self.matcher.belongs_to_service(uri) => {
                self.resolve_url(uri, &url);
            }
            _ => {
                debug!("{} does not belong to the service", uri);
                counter!("linklab_resolutions_total", "outcome" => "unrecognized").increment(1);
                self.deliver(LinkResult::Resolved(fallback_link(uri)));
            }
        }
        true
    }

    /// Resolves `uri` regardless of its domain.
    ///
    /// An empty or unparseable string is caller misuse and is reported as
    /// [`LinkResult::Failed`] with [`LinkLabError::InvalidArgument`]. A valid
    /// URI without a host or path segment fails open like any other failure.
    pub fn resolve(&self, uri: &str) -> Resolution {
        if uri.trim().is_empty() {
            return self.reject(LinkLabError::invalid_argument("uri must not be empty"));
        }

        match Url::parse(uri) {
            Ok(url) => self.resolve_url(uri, &url),
            Err(e) => self.reject(LinkLabError::invalid_argument(format!(
                "'{uri}' is not a valid URI: {e}"
            ))),
        }
    }

    /// Looks up a link reported by install attribution.
    ///
    /// Not fail-open: any failure, including an already-processed id, ends
    /// without a dispatch and the handle yields `None`.
    pub fn resolve_attribution(&self, link_id: &str, domain: &str) -> Resolution {
        self.enqueue_lookup(link_id, domain, LookupOrigin::Attribution)
    }

    fn resolve_url(&self, original: &str, url: &Url) -> Resolution {
        match (link_id(url), link_domain(url)) {
            (Some(id), Some(domain)) => {
                self.enqueue_lookup(&id, domain, LookupOrigin::Uri(original.to_string()))
            }
            _ => {
                debug!("{} has no link id or domain; treating as unrecognized", original);
                counter!("linklab_resolutions_total", "outcome" => "unrecognized").increment(1);
                self.deliver(LinkResult::Resolved(fallback_link(original)))
            }
        }
    }

    fn enqueue_lookup(&self, link_id: &str, domain: &str, origin: LookupOrigin) -> Resolution {
        let (reply, resolution) = Resolution::channel();
        self.enqueue(LookupJob::Lookup(LookupRequest {
            link_id: link_id.to_string(),
            domain: domain.to_string(),
            origin,
            reply: Some(reply),
        }));
        resolution
    }

    fn reject(&self, error: LinkLabError) -> Resolution {
        warn!("Rejected resolve request: {}", error);
        counter!("linklab_resolutions_total", "outcome" => "failed").increment(1);
        self.deliver(LinkResult::Failed(error))
    }

    fn deliver(&self, result: LinkResult) -> Resolution {
        let (reply, resolution) = Resolution::channel();
        self.enqueue(LookupJob::Deliver {
            result,
            reply: Some(reply),
        });
        resolution
    }

    fn enqueue(&self, job: LookupJob) {
        if self.jobs.send(job).is_err() {
            warn!("Lookup worker stopped; request dropped");
        }
    }
}
