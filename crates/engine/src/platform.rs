//! Host capabilities used by manual switches.
//!
//! Abstracts location and fullscreen APIs behind traits, allowing the engine
//! to be tested without a browser.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Read and change the page location.
pub trait Navigator: Send + Sync {
    /// `None` when the host has no addressable location.
    fn current_url(&self) -> Option<String>;

    fn navigate(&self, url: &str);
}

/// Why a fullscreen request did not go through.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FullscreenError {
    /// Rejected by the host, e.g. no user gesture.
    #[error("fullscreen request rejected: {0}")]
    Rejected(String),

    #[error("fullscreen unsupported")]
    Unsupported,
}

/// Settles once the host has accepted or rejected the request.
pub type FullscreenFuture = BoxFuture<'static, Result<(), FullscreenError>>;

/// OS-level fullscreen entry.
pub trait FullscreenController: Send + Sync {
    /// Issue the request.
    ///
    /// The request is started before this returns; the future only reports
    /// how it settled.
    fn request_fullscreen(&self) -> FullscreenFuture;
}

/// An issued fullscreen request whose outcome nobody waits on.
pub struct FullscreenRequest {
    pending: FullscreenFuture,
}

impl std::fmt::Debug for FullscreenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullscreenRequest").finish_non_exhaustive()
    }
}

impl FullscreenRequest {
    /// Wrap an already issued request.
    pub fn new(pending: FullscreenFuture) -> Self {
        Self { pending }
    }

    /// Wait for the outcome. Rejections are logged and discarded; the UX
    /// switch that issued the request is already in effect.
    pub async fn settle(self) -> bool {
        match self.pending.await {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(error = %err, "fullscreen request ignored");
                false
            }
        }
    }
}

/// Navigator for hosts without a location.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn current_url(&self) -> Option<String> {
        None
    }

    fn navigate(&self, _url: &str) {}
}

/// Fullscreen controller for hosts without a fullscreen API.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFullscreen;

impl FullscreenController for NullFullscreen {
    fn request_fullscreen(&self) -> FullscreenFuture {
        Box::pin(futures::future::ready(Err(FullscreenError::Unsupported)))
    }
}

/// In-memory location with navigation history.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    current: Mutex<Option<String>>,
    history: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    /// Navigator positioned at `url`.
    pub fn at(url: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(Some(url.into())),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every navigation performed so far.
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl Navigator for MemoryNavigator {
    fn current_url(&self) -> Option<String> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn navigate(&self, url: &str) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(url.to_string());
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(url.to_string());
        }
    }
}

/// Fullscreen controller that grants or rejects every request.
#[derive(Debug, Default)]
pub struct HeadlessFullscreen {
    grant: AtomicBool,
    requests: AtomicUsize,
}

impl HeadlessFullscreen {
    /// Grants every request.
    pub fn granting() -> Self {
        Self {
            grant: AtomicBool::new(true),
            requests: AtomicUsize::new(0),
        }
    }

    /// Rejects like a browser called outside a user gesture.
    pub fn rejecting() -> Self {
        Self::default()
    }

    /// Number of requests issued so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl FullscreenController for HeadlessFullscreen {
    fn request_fullscreen(&self) -> FullscreenFuture {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let outcome = if self.grant.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FullscreenError::Rejected("no user gesture".to_string()))
        };
        Box::pin(futures::future::ready(outcome))
    }
}
