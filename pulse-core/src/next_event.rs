// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Future resolving with a channel's next emitted value.
//!
//! Both channel kinds build `next_event()` the same way: a one-shot subscription
//! fills an [`EventSlot`], and the returned [`NextEvent`] waits on the other end.

use crate::{PulseError, Result, SubscriptionHandle};
use alloc::sync::Arc;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use parking_lot::Mutex;

/// Sending half of a [`NextEvent`], owned by the one-shot subscriber.
#[derive(Debug)]
pub struct EventSlot<T> {
    sender: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> EventSlot<T> {
    /// Create a connected slot/receiver pair.
    #[must_use]
    pub fn pair() -> (Arc<Self>, oneshot::Receiver<T>) {
        let (sender, receiver) = oneshot::channel();
        let slot = Arc::new(Self {
            sender: Mutex::new(Some(sender)),
        });
        (slot, receiver)
    }

    /// Deliver `value`. Returns `false` if the slot was already used or the waiter
    /// went away.
    pub fn fill(&self, value: T) -> bool {
        match self.sender.lock().take() {
            Some(sender) => sender.send(value).is_ok(),
            None => false,
        }
    }
}

/// Future returned by a channel's `next_event()`.
///
/// Resolves with the first value emitted after it was created, or with
/// [`PulseError::ChannelDropped`] if every handle to the channel goes away first.
/// Dropping the future removes its one-shot subscription.
#[must_use = "futures do nothing unless polled"]
#[derive(Debug)]
pub struct NextEvent<T> {
    receiver: oneshot::Receiver<T>,
    subscription: SubscriptionHandle,
}

impl<T> NextEvent<T> {
    /// Wrap the receiving half and the subscription that feeds it.
    pub fn new(receiver: oneshot::Receiver<T>, subscription: SubscriptionHandle) -> Self {
        Self {
            receiver,
            subscription,
        }
    }

    /// The one-shot subscription backing this future.
    #[must_use]
    pub fn subscription(&self) -> &SubscriptionHandle {
        &self.subscription
    }
}

impl<T> Future for NextEvent<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|outcome| outcome.map_err(|_canceled| PulseError::ChannelDropped))
    }
}

impl<T> Drop for NextEvent<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
