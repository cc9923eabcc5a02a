// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{DispatchStrategy, Emission};
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::future::Future;
use core::panic::AssertUnwindSafe;
use futures::future::{self, join_all, BoxFuture};
use futures::{FutureExt, TryFutureExt};
use parking_lot::Mutex;
use pulse_core::{
    panic_message, EventSlot, FailureReporter, FirstEmission, Latch, NextEvent, PulseError,
    Result, SubscriberRegistry, SubscriptionHandle, SubscriptionId,
};
use std::panic::catch_unwind;

type Handler<T> = dyn Fn(T) -> BoxFuture<'static, Result<()>> + Send + Sync;

struct Shared<T> {
    registry: Arc<SubscriberRegistry<Handler<T>>>,
    last_value: Mutex<Option<T>>,
    first: Latch,
    strategy: DispatchStrategy,
    reporter: FailureReporter,
    upstream: Mutex<Option<SubscriptionHandle>>,
}

/// A typed event channel whose handlers return futures.
///
/// [`emit`](Self::emit) hands back an [`Emission`] that completes once every
/// handler has finished, run according to the channel's [`DispatchStrategy`]:
///
/// - [`Sequential`](DispatchStrategy::Sequential): each handler is awaited before the
///   next one is started; the first failure is returned and the rest are skipped.
/// - [`Concurrent`](DispatchStrategy::Concurrent): all handlers are started in
///   subscription order, then awaited together; failures are returned after all of
///   them settle.
///
/// The subscriber list is snapshotted at every `emit`, with the same rules as
/// [`SyncChannel`](https://docs.rs/pulse-sync): handlers added during an emission
/// wait for the next one, handlers removed before their turn are skipped.
///
/// Cheap to clone; all clones share the same subscribers and last value.
pub struct AsyncChannel<T: Clone + Send + Sync + 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + Sync + 'static> AsyncChannel<T> {
    /// Creates a sequential channel reporting to the process-wide failure hook.
    #[must_use]
    pub fn new() -> Self {
        Self::build(DispatchStrategy::default(), FailureReporter::global())
    }

    /// Creates a channel with the given dispatch strategy.
    #[must_use]
    pub fn with_strategy(strategy: DispatchStrategy) -> Self {
        Self::build(strategy, FailureReporter::global())
    }

    /// Creates a sequential channel whose unhandled failures (detached emissions,
    /// failed replays) go to `handler`.
    pub fn with_failure_handler<F>(handler: F) -> Self
    where
        F: Fn(&PulseError) + Send + Sync + 'static,
    {
        Self::build(
            DispatchStrategy::default(),
            FailureReporter::with_handler(handler),
        )
    }

    /// Creates a channel with both a dispatch strategy and a failure handler.
    pub fn with_strategy_and_failure_handler<F>(strategy: DispatchStrategy, handler: F) -> Self
    where
        F: Fn(&PulseError) + Send + Sync + 'static,
    {
        Self::build(strategy, FailureReporter::with_handler(handler))
    }

    fn build(strategy: DispatchStrategy, reporter: FailureReporter) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: Arc::new(SubscriberRegistry::new()),
                last_value: Mutex::new(None),
                first: Latch::new(),
                strategy,
                reporter,
                upstream: Mutex::new(None),
            }),
        }
    }

    /// The dispatch strategy this channel was built with.
    #[must_use]
    pub fn strategy(&self) -> DispatchStrategy {
        self.shared.strategy
    }

    fn erase<F, Fut, E>(handler: F) -> Arc<Handler<T>>
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Arc::new(move |value: T| -> BoxFuture<'static, Result<()>> {
            handler(value).map_err(PulseError::user_error).boxed()
        })
    }

    /// Subscribe `handler` to every future emission.
    ///
    /// An `Err` from the handler's future becomes [`PulseError::UserError`] in the
    /// emission's result.
    pub fn subscribe<F, Fut, E>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.shared.registry.insert(Self::erase(handler), false)
    }

    /// Subscribe `handler` to the next emission only.
    pub fn subscribe_once<F, Fut, E>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.shared.registry.insert(Self::erase(handler), true)
    }

    /// Subscribe `handler`, then replay the last emitted value to it and wait for
    /// that replay to finish.
    ///
    /// A failing replay is sent to the failure handler; the subscription stays
    /// active either way.
    pub async fn subscribe_immediate<F, Fut, E>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let handler = Self::erase(handler);
        let handle = self.shared.registry.insert(Arc::clone(&handler), false);

        if let Some(value) = self.value() {
            trace!("replaying last value to subscriber {}", handle.id());
            if let Err(error) = invoke(&handler, value).await {
                warn!("replay to subscriber {} failed: {}", handle.id(), error);
                self.shared.reporter.report(&error);
            }
        }
        handle
    }

    /// Remove the subscription with the given id. Returns `false` if there is none.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.registry.remove(id)
    }

    /// Dispatch `value` to the current subscribers.
    ///
    /// The last value, the first-emission signal and the subscriber snapshot are
    /// all updated before this returns; the handlers themselves run as described on
    /// [`DispatchStrategy`]. With the concurrent strategy every handler has already
    /// been called (and its future created) when `emit` returns.
    pub fn emit(&self, value: T) -> Emission {
        *self.shared.last_value.lock() = Some(value.clone());
        self.shared.first.fire();

        let snapshot = self.shared.registry.snapshot();
        trace!(
            "emitting to {} subscribers ({})",
            snapshot.len(),
            self.shared.strategy
        );

        let dispatch = match self.shared.strategy {
            DispatchStrategy::Sequential => {
                dispatch_sequential(Arc::clone(&self.shared.registry), snapshot, value)
            }
            DispatchStrategy::Concurrent => {
                dispatch_concurrent(&self.shared.registry, snapshot, value)
            }
        };
        Emission::new(dispatch, self.shared.reporter.clone())
    }

    /// Emit `value` without waiting for the handlers.
    ///
    /// Shorthand for `self.emit(value).detach()`.
    pub fn emit_detached(&self, value: T) {
        self.emit(value).detach();
    }

    /// Future resolving with the value of the next emission after this call.
    pub fn next_event(&self) -> NextEvent<T> {
        let (slot, receiver) = EventSlot::pair();
        let deliver: Arc<Handler<T>> =
            Arc::new(move |value: T| -> BoxFuture<'static, Result<()>> {
                slot.fill(value);
                future::ready(Ok(())).boxed()
            });
        let subscription = self.shared.registry.insert(deliver, true);
        NextEvent::new(receiver, subscription)
    }

    /// Future resolving once this channel has emitted at least once.
    pub fn first(&self) -> FirstEmission {
        self.shared.first.wait()
    }

    /// The most recently emitted value, if any.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.shared.last_value.lock().clone()
    }

    #[must_use]
    pub fn has_value(&self) -> bool {
        self.shared.last_value.lock().is_some()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.registry.is_empty()
    }

    /// A derived channel re-emitting every value of this one.
    pub fn pipe(&self) -> AsyncChannel<T> {
        self.pipe_map(|value| value)
    }

    /// A derived channel emitting `transform(value)` for every value of this one.
    ///
    /// The derived channel always uses the default (sequential) strategy, whatever
    /// this channel's strategy is, and shares this channel's failure handler. Each
    /// source emission awaits the derived emission it triggers, so the derived
    /// handlers' failures flow back into the source's [`Emission`].
    pub fn pipe_map<U, F>(&self, transform: F) -> AsyncChannel<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let derived =
            AsyncChannel::build(DispatchStrategy::default(), self.shared.reporter.clone());
        let relay = derived.clone();
        let forward: Arc<Handler<T>> =
            Arc::new(move |value: T| -> BoxFuture<'static, Result<()>> {
                relay.emit(transform(value)).boxed()
            });
        let upstream = self.shared.registry.insert(forward, false);
        *derived.shared.upstream.lock() = Some(upstream);
        derived
    }

    /// Disconnect a derived channel from its source.
    ///
    /// Returns `false` if this channel is not derived or is already disconnected.
    pub fn unpipe(&self) -> bool {
        self.shared
            .upstream
            .lock()
            .take()
            .is_some_and(|upstream| upstream.unsubscribe())
    }

    /// Whether this channel is still fed by a source channel.
    #[must_use]
    pub fn is_piped(&self) -> bool {
        self.shared
            .upstream
            .lock()
            .as_ref()
            .is_some_and(SubscriptionHandle::is_active)
    }
}

/// Start one handler, turning a panic (while creating or polling its future) into
/// [`PulseError::CallbackPanic`].
fn invoke<T>(handler: &Arc<Handler<T>>, value: T) -> BoxFuture<'static, Result<()>> {
    match catch_unwind(AssertUnwindSafe(|| handler(value))) {
        Ok(work) => AssertUnwindSafe(work)
            .catch_unwind()
            .map(|outcome| {
                outcome.unwrap_or_else(|payload| {
                    Err(PulseError::callback_panic(panic_message(&*payload)))
                })
            })
            .boxed(),
        Err(payload) => {
            future::ready(Err(PulseError::callback_panic(panic_message(&*payload)))).boxed()
        }
    }
}

fn dispatch_sequential<T: Clone + Send + Sync + 'static>(
    registry: Arc<SubscriberRegistry<Handler<T>>>,
    snapshot: Vec<(SubscriptionId, Arc<Handler<T>>)>,
    value: T,
) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        for (id, handler) in snapshot {
            if !registry.claim(id) {
                trace!("subscriber {} removed during dispatch, skipping", id);
                continue;
            }
            if let Err(error) = invoke(&handler, value.clone()).await {
                debug!("subscriber {} failed, stopping sequential dispatch", id);
                return Err(error);
            }
        }
        Ok(())
    })
}

fn dispatch_concurrent<T: Clone + Send + Sync + 'static>(
    registry: &SubscriberRegistry<Handler<T>>,
    snapshot: Vec<(SubscriptionId, Arc<Handler<T>>)>,
    value: T,
) -> BoxFuture<'static, Result<()>> {
    let mut running = Vec::with_capacity(snapshot.len());
    for (id, handler) in snapshot {
        if !registry.claim(id) {
            trace!("subscriber {} removed during dispatch, skipping", id);
            continue;
        }
        running.push(invoke(&handler, value.clone()));
    }

    Box::pin(async move {
        let failures: Vec<PulseError> = join_all(running)
            .await
            .into_iter()
            .filter_map(core::result::Result::err)
            .collect();
        match PulseError::aggregate(failures) {
            Some(error) => {
                debug!("concurrent dispatch settled with failures: {}", error);
                Err(error)
            }
            None => Ok(()),
        }
    })
}

impl<T: Clone + Send + Sync + 'static> Default for AsyncChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for AsyncChannel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> fmt::Debug for AsyncChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncChannel")
            .field("strategy", &self.shared.strategy)
            .field("subscribers", &self.subscriber_count())
            .field("has_value", &self.has_value())
            .field("piped", &self.is_piped())
            .finish()
    }
}
