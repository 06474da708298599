//! Provider that serves a referrer string known up front.

use crate::domain::ports::InstallReferrerProvider;
use crate::error::LinkLabError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// Install-referrer provider backed by a fixed payload.
///
/// Hosts that receive the referrer out of band (a platform bridge, a command
/// line flag) wrap it here. Without a payload the provider behaves like a
/// platform where the referrer service is not supported.
#[derive(Debug, Default)]
pub struct StaticReferrerProvider {
    payload: Option<String>,
    connected: AtomicBool,
    disconnects: AtomicUsize,
}

impl StaticReferrerProvider {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            ..Default::default()
        }
    }

    /// A provider whose connection always fails.
    pub fn unsupported() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Number of times the connection was released.
    pub fn disconnect_count(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InstallReferrerProvider for StaticReferrerProvider {
    async fn connect(&self) -> Result<(), LinkLabError> {
        if self.payload.is_none() {
            return Err(LinkLabError::referrer("install referrer not supported"));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn install_referrer(&self) -> Result<String, LinkLabError> {
        if !self.is_connected() {
            return Err(LinkLabError::referrer("provider is not connected"));
        }
        self.payload
            .clone()
            .ok_or_else(|| LinkLabError::referrer("install referrer not supported"))
    }

    async fn disconnect(&self) {
        debug!("Releasing install referrer connection");
        self.connected.store(false, Ordering::SeqCst);
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}
