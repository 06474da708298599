//! Messages consumed by the background lookup worker.

use crate::domain::LinkResult;
use tokio::sync::oneshot;

/// Completion side of a [`Resolution`].
pub type Reply = oneshot::Sender<LinkResult>;

/// Where a lookup came from; decides what happens when it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOrigin {
    /// An incoming or programmatic URI. Failures fall back to an
    /// unrecognized link built from this string.
    Uri(String),
    /// The install-referrer payload. Failures end silently.
    Attribution,
}

/// A single remote lookup.
#[derive(Debug)]
pub struct LookupRequest {
    pub link_id: String,
    pub domain: String,
    pub origin: LookupOrigin,
    pub reply: Option<Reply>,
}

/// Unit of work for [`crate::application::run_lookup_worker`].
///
/// Ready-made results travel through the same queue as lookups so that
/// listeners observe results in request order.
#[derive(Debug)]
pub enum LookupJob {
    Lookup(LookupRequest),
    Deliver {
        result: LinkResult,
        reply: Option<Reply>,
    },
}

/// Awaitable handle for one resolution request.
///
/// Resolves once every listener has seen the result. Yields `None` when the
/// request ended without a dispatch (already-processed link, attribution
/// failure, or the library shut down). Dropping the handle does not cancel
/// anything.
#[derive(Debug)]
pub struct Resolution {
    rx: oneshot::Receiver<LinkResult>,
}

impl Resolution {
    /// Creates a linked reply/handle pair.
    pub fn channel() -> (Reply, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }

    pub async fn wait(self) -> Option<LinkResult> {
        self.rx.await.ok()
    }
}
