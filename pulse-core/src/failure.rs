// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reporting of failures nobody is awaiting.
//!
//! A subscriber that fails inside `SyncChannel::emit`, inside a detached async
//! handler, or inside an emission whose result was never awaited has no caller to
//! return its error to. Such failures go through a [`FailureReporter`]:
//!
//! 1. the channel's own handler, if one was configured, otherwise
//! 2. the process-wide hook installed with [`set_unhandled_failure_hook`], otherwise
//! 3. an `error!` log line.
//!
//! Reporting never panics and never interrupts the dispatch that produced the error.

use crate::PulseError;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use parking_lot::RwLock;

/// Callback receiving failures that cannot be returned to a caller.
pub type FailureHandler = Arc<dyn Fn(&PulseError) + Send + Sync>;

static UNHANDLED_FAILURE_HOOK: RwLock<Option<FailureHandler>> = parking_lot::const_rwlock(None);

/// Install the process-wide hook for unhandled subscriber failures.
///
/// Replaces any previously installed hook. Channels constructed with their own
/// failure handler do not consult the hook.
pub fn set_unhandled_failure_hook<F>(hook: F)
where
    F: Fn(&PulseError) + Send + Sync + 'static,
{
    let previous = UNHANDLED_FAILURE_HOOK.write().replace(Arc::new(hook));
    if previous.is_some() {
        warn!("unhandled failure hook replaced");
    }
}

/// Remove the process-wide hook, restoring the logging fallback.
pub fn clear_unhandled_failure_hook() {
    UNHANDLED_FAILURE_HOOK.write().take();
}

/// Report `error` through the process-wide hook, or log it if none is installed.
pub fn report_unhandled(error: &PulseError) {
    // Clone out of the lock so a hook may itself (re)install hooks
    let hook = UNHANDLED_FAILURE_HOOK.read().clone();
    match hook {
        Some(hook) => hook(error),
        None => error!("unhandled subscriber failure: {}", error),
    }
}

/// Render a caught panic payload as text.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Per-channel destination for unhandled failures.
///
/// Cheap to clone; derived channels created by `pipe` share their source's reporter.
#[derive(Clone, Default)]
pub struct FailureReporter {
    handler: Option<FailureHandler>,
}

impl FailureReporter {
    /// Reporter that defers to the process-wide hook.
    #[must_use]
    pub fn global() -> Self {
        Self { handler: None }
    }

    /// Reporter that sends every failure to `handler`.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&PulseError) + Send + Sync + 'static,
    {
        Self {
            handler: Some(Arc::new(handler)),
        }
    }

    /// Whether a channel-specific handler is configured.
    #[must_use]
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Deliver `error`.
    pub fn report(&self, error: &PulseError) {
        match &self.handler {
            Some(handler) => handler(error),
            None => report_unhandled(error),
        }
    }
}

impl fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureReporter")
            .field("handler", &self.handler.as_ref().map(|_| "custom"))
            .finish()
    }
}
