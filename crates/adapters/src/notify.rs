// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use thiserror::Error;
use tw_core::Notification;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter that delivers a run's consolidated alert.
///
/// `notify` returns only after delivery is confirmed: the caller persists
/// the updated history on `Ok`, so a fire-and-forget implementation would
/// lose alerts whenever delivery later fails.
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS, `notify-rust` uses `mac-notification-sys` (Cocoa bindings) to send
/// notifications via the Notification Center. The first notification triggers
/// `ensure_application_set()` which runs an AppleScript to look up a bundle
/// identifier. Without Automation permissions, that AppleScript blocks forever,
/// so the bundle identifier is pre-set at construction time.
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let title = notification.title();
        let body = notification.render_text();
        // notify_rust::Notification::show() is synchronous; run it on the
        // blocking pool and wait for the outcome.
        let shown = tokio::task::spawn_blocking(move || {
            tracing::info!(%title, "sending desktop notification");
            notify_rust::Notification::new()
                .summary(&title)
                .body(&body)
                .show()
                .map(|_| ())
                .map_err(|e| NotifyError::SendFailed(e.to_string()))
        })
        .await
        .map_err(|e| NotifyError::SendFailed(format!("notification task failed: {e}")))?;

        match &shown {
            Ok(()) => tracing::info!("desktop notification sent"),
            Err(e) => tracing::warn!(error = %e, "desktop notification failed"),
        }
        shown
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tw_core::Notification;

    #[derive(Default)]
    struct FakeNotifyState {
        calls: Vec<Notification>,
        failure: Option<String>,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Get all successfully delivered notifications
        pub fn calls(&self) -> Vec<Notification> {
            self.inner.lock().calls.clone()
        }

        /// Make subsequent sends fail
        pub fn fail_with(&self, message: impl Into<String>) {
            self.inner.lock().failure = Some(message.into());
        }

        pub fn recover(&self) {
            self.inner.lock().failure = None;
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            let mut state = self.inner.lock();
            if let Some(message) = &state.failure {
                return Err(NotifyError::SendFailed(message.clone()));
            }
            state.calls.push(notification.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
