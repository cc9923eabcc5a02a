// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! One-way latch backing a channel's `first()` future.
//!
//! A channel creates its latch at construction time and fires it on every emission;
//! only the first call has an effect. Waiters that arrive after the latch fired
//! resolve immediately instead of waiting for an emission that already happened.

use alloc::sync::Arc;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};

/// Runtime-agnostic one-shot latch.
///
/// Clones share the same state.
///
/// # Example
///
/// ```
/// use pulse_core::Latch;
///
/// # #[tokio::main]
/// # async fn main() {
/// let latch = Latch::new();
/// let waiter = latch.wait();
///
/// assert!(latch.fire());
/// assert!(!latch.fire());
///
/// waiter.await;
/// latch.wait().await; // already fired: resolves at once
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Latch {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    fired: AtomicBool,
    event: Event,
}

impl Latch {
    /// Create a latch that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                fired: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Fire the latch, waking all waiters.
    ///
    /// Returns `true` only for the call that flipped the latch.
    pub fn fire(&self) -> bool {
        let first = !self.inner.fired.swap(true, Ordering::AcqRel);
        if first {
            self.inner.event.notify(usize::MAX);
        }
        first
    }

    /// Check if the latch has fired (non-blocking).
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Future resolving once the latch has fired.
    ///
    /// The future owns a clone of the latch, so it can outlive the channel that
    /// handed it out.
    #[must_use]
    pub fn wait(&self) -> FirstEmission {
        FirstEmission {
            latch: self.clone(),
            listener: None,
        }
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by a channel's `first()`, resolving after its first emission.
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct FirstEmission {
    latch: Latch,
    listener: Option<EventListener>,
}

impl FirstEmission {
    /// Whether the awaited emission has already happened.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.latch.is_fired()
    }
}

impl Future for FirstEmission {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        loop {
            if this.latch.is_fired() {
                return Poll::Ready(());
            }

            // Register, then re-check: fire() may have run in between
            let Some(listener) = this.listener.as_mut() else {
                this.listener = Some(this.latch.inner.event.listen());
                continue;
            };

            if Pin::new(listener).poll(cx).is_pending() {
                return Poll::Pending;
            }
            this.listener = None;
        }
    }
}
