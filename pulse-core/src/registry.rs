// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Token-keyed, insertion-ordered subscriber table.
//!
//! Entries are stored in a `BTreeMap` keyed by [`SubscriptionId`]. Ids grow
//! monotonically, so key order is subscription order and dispatch can walk the map
//! front to back.
//!
//! Dispatch never iterates the live map. It takes a [`snapshot`](SubscriberRegistry::snapshot)
//! (a shallow copy of `(id, callback)` pairs) and, right before invoking each entry,
//! asks [`claim`](SubscriberRegistry::claim) whether that entry is still registered.
//! Subscribers removed mid-dispatch are skipped; subscribers added mid-dispatch wait
//! for the next emission. The lock is released before any callback runs, so
//! callbacks may subscribe, unsubscribe or emit on the same channel.

use crate::subscription::{SubscriptionHandle, SubscriptionId, Unsubscribe};
use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use parking_lot::Mutex;

struct Entry<C: ?Sized> {
    callback: Arc<C>,
    once: bool,
}

/// Ordered set of callbacks of type `C` (usually a `dyn Fn` object).
pub struct SubscriberRegistry<C: ?Sized> {
    entries: Mutex<BTreeMap<SubscriptionId, Entry<C>>>,
}

impl<C: ?Sized + Send + Sync + 'static> SubscriberRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register `callback` and return a handle to the new entry.
    ///
    /// A `once` entry is removed by the first [`claim`](Self::claim) that finds it,
    /// so it is dispatched at most one time.
    pub fn insert(self: &Arc<Self>, callback: Arc<C>, once: bool) -> SubscriptionHandle {
        let id = SubscriptionId::next();
        self.entries.lock().insert(id, Entry { callback, once });
        trace!("subscriber {} registered (once: {})", id, once);
        SubscriptionHandle::new(id, self)
    }

    /// Remove the entry with the given id; `false` if there was none.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let removed = self.entries.lock().remove(&id).is_some();
        if removed {
            trace!("subscriber {} removed", id);
        }
        removed
    }

    /// Whether `id` is currently registered.
    #[must_use]
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.lock().contains_key(&id)
    }

    /// Shallow copy of the current entries, in subscription order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(SubscriptionId, Arc<C>)> {
        self.entries
            .lock()
            .iter()
            .map(|(id, entry)| (*id, Arc::clone(&entry.callback)))
            .collect()
    }

    /// Check, at the moment of its turn, that a snapshotted entry may be invoked.
    ///
    /// Returns `false` if the entry has been removed since the snapshot. A one-shot
    /// entry is removed here, under the same lock, which is what makes it fire at
    /// most once even when emissions race or nest.
    pub fn claim(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(&id).map(|entry| entry.once) {
            Some(true) => {
                entries.remove(&id);
                true
            }
            Some(false) => true,
            None => false,
        }
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<C: ?Sized + Send + Sync + 'static> Default for SubscriberRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized + Send + Sync + 'static> Unsubscribe for SubscriberRegistry<C> {
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.remove(id)
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.contains(id)
    }
}
