//! Background worker that performs remote lookups one at a time.

use crate::api::dto::LinkResponse;
use crate::application::dispatcher::Dispatcher;
use crate::domain::ports::LinkApi;
use crate::domain::{LinkData, LinkResult, LookupJob, LookupOrigin, LookupRequest, ProcessedIds};
use crate::error::LinkLabError;
use crate::utils::link_uri::merge_query_parameters;
use metrics::counter;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drains the lookup queue until every sender is gone.
///
/// Jobs are handled strictly in arrival order, so at most one lookup is in
/// flight. Every outcome is either handed to the dispatcher or, for
/// duplicates and failed attribution lookups, dropped without a dispatch.
pub async fn run_lookup_worker(
    mut rx: mpsc::UnboundedReceiver<LookupJob>,
    api: Arc<dyn LinkApi>,
    processed: Arc<ProcessedIds>,
    dispatcher: Dispatcher,
) {
    while let Some(job) = rx.recv().await {
        match job {
            LookupJob::Deliver { result, reply } => dispatcher.dispatch(result, reply),
            LookupJob::Lookup(request) => {
                process_lookup(request, api.as_ref(), &processed, &dispatcher).await
            }
        }
    }
    debug!("Lookup queue closed, worker exiting");
}

async fn process_lookup(
    request: LookupRequest,
    api: &dyn LinkApi,
    processed: &ProcessedIds,
    dispatcher: &Dispatcher,
) {
    let LookupRequest {
        link_id,
        domain,
        origin,
        reply,
    } = request;

    if processed.contains(&link_id) {
        debug!("Link {} already processed, skipping", link_id);
        counter!("linklab_resolutions_total", "outcome" => "duplicate").increment(1);
        return;
    }

    match fetch_link_data(api, &link_id, &domain).await {
        Ok(link) => {
            if let Some(id) = link.id() {
                processed.insert(id);
            }
            info!("Resolved link {} on {}", link_id, domain);
            counter!("linklab_resolutions_total", "outcome" => "resolved").increment(1);

            let link = prepare_for_dispatch(&link, link.full_link());
            dispatcher.dispatch(LinkResult::Resolved(link), reply);
        }
        Err(e) => match origin {
            LookupOrigin::Uri(original) => {
                warn!(
                    "Lookup of {} failed ({}): {}; falling back to unrecognized link",
                    link_id,
                    e.code(),
                    e
                );
                counter!("linklab_resolutions_total", "outcome" => "unrecognized").increment(1);
                dispatcher.dispatch(LinkResult::Resolved(fallback_link(&original)), reply);
            }
            LookupOrigin::Attribution => {
                warn!("Attribution lookup of {} failed: {}", link_id, e);
                counter!("linklab_attribution_total", "outcome" => "lookup_failed").increment(1);
            }
        },
    }
}

async fn fetch_link_data(
    api: &dyn LinkApi,
    link_id: &str,
    domain: &str,
) -> Result<LinkData, LinkLabError> {
    let body = api.fetch_link(link_id, domain).await?;
    LinkResponse::decode(&body)
}

/// Attaches the query parameters of `dispatched_uri` to `link`.
pub(crate) fn prepare_for_dispatch(link: &LinkData, dispatched_uri: &str) -> LinkData {
    link.with_parameters(merge_query_parameters(link.parameters(), dispatched_uri))
}

/// Fail-open value for `uri`, carrying the URI's own query parameters.
pub(crate) fn fallback_link(uri: &str) -> LinkData {
    prepare_for_dispatch(&LinkData::unrecognized(uri), uri)
}
