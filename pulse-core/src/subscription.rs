// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Subscription tokens and handles.
//!
//! Every subscribe call on a channel mints a fresh [`SubscriptionId`]. Closures have
//! no usable identity in Rust, so the token is what identifies a registration: the
//! same callback logic subscribed twice yields two tokens, and removing one of them
//! never touches the other.

use alloc::sync::{Arc, Weak};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque token identifying one registration on one channel.
///
/// Ids are allocated from a process-wide counter, so they increase monotonically in
/// the order subscriptions are made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocate the next id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something registrations can be removed from.
///
/// Implemented by [`SubscriberRegistry`](crate::SubscriberRegistry); handles only
/// see this trait so they stay independent of the callback type.
pub trait Unsubscribe: Send + Sync {
    /// Remove the registration, returning `true` if it was present.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Whether the registration is still present.
    fn is_subscribed(&self, id: SubscriptionId) -> bool;
}

/// Handle to a single registration, returned by every subscribe-family call.
///
/// The handle holds a weak reference to the channel's registry: it never keeps the
/// channel alive, and unsubscribing after the channel is gone does nothing.
/// Dropping the handle leaves the subscription in place.
#[derive(Clone)]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    registry: Weak<dyn Unsubscribe>,
}

impl SubscriptionHandle {
    /// Create a handle for `id` in `registry`.
    pub fn new<R>(id: SubscriptionId, registry: &Arc<R>) -> Self
    where
        R: Unsubscribe + 'static,
    {
        let registry: Arc<dyn Unsubscribe> = registry.clone();
        Self {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    /// The token this handle represents.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove exactly this registration from its channel.
    ///
    /// Idempotent: returns `true` only for the call that actually removed it.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.unsubscribe(self.id))
    }

    /// Whether the registration is still present on a live channel.
    ///
    /// A one-shot subscription reports `false` once it has been claimed for dispatch.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.is_subscribed(self.id))
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
