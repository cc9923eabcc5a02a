// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use alloc::sync::Arc;
use core::fmt;
use core::future::Future;
use core::panic::AssertUnwindSafe;
use futures::TryFutureExt;
use parking_lot::Mutex;
use pulse_core::{
    panic_message, spawn_detached, EventSlot, FailureReporter, FirstEmission, Latch, NextEvent,
    PulseError, SubscriberRegistry, SubscriptionHandle, SubscriptionId,
};
use std::panic::catch_unwind;

type Callback<T> = dyn Fn(T) + Send + Sync;

struct Shared<T> {
    registry: Arc<SubscriberRegistry<Callback<T>>>,
    last_value: Mutex<Option<T>>,
    first: Latch,
    reporter: FailureReporter,
    upstream: Mutex<Option<SubscriptionHandle>>,
}

/// A typed event channel that dispatches synchronously to every subscriber.
///
/// `SyncChannel` is the push side and the registry at once: callbacks subscribe to
/// it, and [`emit`](Self::emit) calls each of them, in subscription order, before
/// returning. The last emitted value is retained for [`value`](Self::value) and
/// [`subscribe_immediate`](Self::subscribe_immediate).
///
/// Cheap to clone; all clones share the same subscribers and last value.
///
/// See the [crate documentation](crate) for examples and the dispatch rules.
pub struct SyncChannel<T: Clone + Send + Sync + 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + Sync + 'static> SyncChannel<T> {
    /// Creates a channel with no subscribers and no value.
    ///
    /// Failures nobody can observe (panicking subscribers, failing async
    /// subscribers) go to the process-wide unhandled-failure hook.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reporter(FailureReporter::global())
    }

    /// Creates a channel whose unhandled failures are sent to `handler` instead of
    /// the process-wide hook.
    pub fn with_failure_handler<F>(handler: F) -> Self
    where
        F: Fn(&PulseError) + Send + Sync + 'static,
    {
        Self::with_reporter(FailureReporter::with_handler(handler))
    }

    fn with_reporter(reporter: FailureReporter) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: Arc::new(SubscriberRegistry::new()),
                last_value: Mutex::new(None),
                first: Latch::new(),
                reporter,
                upstream: Mutex::new(None),
            }),
        }
    }

    /// Subscribe `callback` to every future emission.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.shared.registry.insert(Arc::new(callback), false)
    }

    /// Subscribe `callback`, then replay the last emitted value to it, if any,
    /// before returning.
    pub fn subscribe_immediate<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let callback: Arc<Callback<T>> = Arc::new(callback);
        let handle = self.shared.registry.insert(Arc::clone(&callback), false);

        if let Some(value) = self.value() {
            trace!("replaying last value to subscriber {}", handle.id());
            self.invoke(handle.id(), &callback, value);
        }
        handle
    }

    /// Subscribe `callback` to the next emission only.
    ///
    /// The subscription removes itself when it is dispatched, so the callback runs
    /// at most once however many emissions follow, even nested ones.
    pub fn subscribe_once<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.shared.registry.insert(Arc::new(callback), true)
    }

    /// Subscribe an asynchronous handler.
    ///
    /// Each emission spawns `handler(value)` on the configured runtime and moves on
    /// without waiting for it. An `Err` or a panic from the handler is reported to
    /// this channel's failure handler.
    pub fn subscribe_async<F, Fut, E>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.subscribe(self.detached(handler))
    }

    /// Subscribe an asynchronous handler and replay the last emitted value to it.
    ///
    /// The replay is spawned like any other invocation: this returns without
    /// waiting for it, and a failing replay goes to the failure handler.
    pub fn subscribe_immediate_async<F, Fut, E>(&self, handler: F) -> SubscriptionHandle
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.subscribe_immediate(self.detached(handler))
    }

    fn detached<F, Fut, E>(&self, handler: F) -> impl Fn(T) + Send + Sync + 'static
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let reporter = self.shared.reporter.clone();
        move |value| {
            spawn_detached(
                handler(value).map_err(PulseError::user_error),
                reporter.clone(),
            );
        }
    }

    /// Remove the subscription with the given id.
    ///
    /// Returns `false`, and does nothing else, when there is no such subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.registry.remove(id)
    }

    /// Dispatch `value` to every current subscriber.
    ///
    /// The value is stored as the last value first. Subscribers are taken from a
    /// snapshot made at the start of the call: one removed during dispatch is
    /// skipped if it has not run yet, one added during dispatch only sees later
    /// emissions. A panicking subscriber is reported to the failure handler and the
    /// remaining subscribers still run; `emit` itself never fails.
    pub fn emit(&self, value: T) {
        *self.shared.last_value.lock() = Some(value.clone());
        self.shared.first.fire();

        let snapshot = self.shared.registry.snapshot();
        trace!("emitting to {} subscribers", snapshot.len());

        for (id, callback) in snapshot {
            if !self.shared.registry.claim(id) {
                trace!("subscriber {} removed during dispatch, skipping", id);
                continue;
            }
            self.invoke(id, &callback, value.clone());
        }
    }

    fn invoke(&self, id: SubscriptionId, callback: &Arc<Callback<T>>, value: T) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(value))) {
            let error = PulseError::callback_panic(panic_message(&*payload));
            warn!("subscriber {} panicked: {}", id, error);
            self.shared.reporter.report(&error);
        }
    }

    /// Future resolving with the value of the next emission after this call.
    ///
    /// Each call returns an independent future.
    pub fn next_event(&self) -> NextEvent<T> {
        let (slot, receiver) = EventSlot::pair();
        let subscription = self.subscribe_once(move |value| {
            slot.fill(value);
        });
        NextEvent::new(receiver, subscription)
    }

    /// Future resolving once this channel has emitted at least once.
    ///
    /// Resolves immediately if the first emission already happened.
    pub fn first(&self) -> FirstEmission {
        self.shared.first.wait()
    }

    /// The most recently emitted value, if any.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.shared.last_value.lock().clone()
    }

    /// Whether anything has been emitted yet.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.shared.last_value.lock().is_some()
    }

    /// Returns the number of current subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.len()
    }

    /// `true` when nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.registry.is_empty()
    }

    /// A derived channel re-emitting every value of this one.
    pub fn pipe(&self) -> SyncChannel<T> {
        self.pipe_map(|value| value)
    }

    /// A derived channel emitting `transform(value)` for every value of this one.
    ///
    /// The derived channel has its own subscribers and shares this channel's
    /// failure handler. It stays connected until [`unpipe`](Self::unpipe) is called
    /// on it or this channel is dropped; dropping the derived channel does not
    /// disconnect it.
    pub fn pipe_map<U, F>(&self, transform: F) -> SyncChannel<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let derived = SyncChannel::with_reporter(self.shared.reporter.clone());
        let relay = derived.clone();
        let upstream = self.subscribe(move |value| relay.emit(transform(value)));
        *derived.shared.upstream.lock() = Some(upstream);
        derived
    }

    /// Disconnect a derived channel from its source.
    ///
    /// Returns `false` if this channel was not created by `pipe`/`pipe_map` or is
    /// already disconnected.
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

impl<T: Clone + Send + Sync + 'static> Default for SyncChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for SyncChannel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> fmt::Debug for SyncChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncChannel")
            .field("subscribers", &self.subscriber_count())
            .field("has_value", &self.has_value())
            .field("piped", &self.is_piped())
            .finish()
    }
}
