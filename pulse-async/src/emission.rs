// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::future::BoxFuture;
use futures::FutureExt;
use pulse_core::{spawn_detached, FailureReporter, Result};

/// Completion signal of [`AsyncChannel::emit`](crate::AsyncChannel::emit).
///
/// Awaiting it drives the dispatch and resolves once every handler of the emission
/// has finished under the channel's strategy, with the emission's failure if any.
///
/// Like every Rust future it is lazy: a sequential emission does not start its
/// first handler until polled. Use [`detach`](Self::detach) for fire-and-forget.
#[must_use = "an emission does nothing unless awaited or detached"]
pub struct Emission {
    dispatch: BoxFuture<'static, Result<()>>,
    reporter: FailureReporter,
}

impl Emission {
    pub(crate) fn new(dispatch: BoxFuture<'static, Result<()>>, reporter: FailureReporter) -> Self {
        Self { dispatch, reporter }
    }

    /// Run the emission on the configured runtime without waiting for it.
    ///
    /// A failure is sent to the channel's failure handler.
    ///
    /// # Panics
    ///
    /// With `runtime-tokio`, panics if called outside a Tokio runtime.
    pub fn detach(self) {
        spawn_detached(self.dispatch, self.reporter);
    }
}

impl Future for Emission {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.dispatch.poll_unpin(cx)
    }
}

impl fmt::Debug for Emission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emission")
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}
