//! Callback payload and observer trait.

use crate::domain::entities::LinkData;
use crate::error::LinkLabError;

/// Outcome delivered to every registered [`LinkListener`].
///
/// Network-driven flows only ever produce [`LinkResult::Resolved`]; a fallback
/// is told apart from a real link by [`LinkData::is_unrecognized`].
/// [`LinkResult::Failed`] is reserved for caller misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResult {
    Resolved(LinkData),
    Failed(LinkLabError),
}

impl LinkResult {
    pub fn link(&self) -> Option<&LinkData> {
        match self {
            Self::Resolved(link) => Some(link),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&LinkLabError> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Observer notified on the dispatcher task.
///
/// Called synchronously, so implementations must not block. Any
/// `Fn(&LinkResult)` closure is a listener.
pub trait LinkListener: Send + Sync {
    fn on_link_result(&self, result: &LinkResult);
}

impl<F> LinkListener for F
where
    F: Fn(&LinkResult) + Send + Sync,
{
    fn on_link_result(&self, result: &LinkResult) {
        self(result)
    }
}
