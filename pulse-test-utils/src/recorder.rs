// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;

/// Shared, ordered log that subscribers append to.
///
/// Clones share the same log, so one clone can be moved into each callback.
#[derive(Debug)]
pub struct Recorder<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn push(&self, entry: T) {
        self.entries.lock().push(entry);
    }

    /// Copy of everything recorded so far, in order.
    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Recorder<String> {
    /// Callback recording every value it receives as `"{label}:{value}"`.
    pub fn labelled<V: Display + 'static>(&self, label: &str) -> impl Fn(V) + Send + Sync + 'static {
        let recorder = self.clone();
        let label = label.to_string();
        move |value: V| recorder.push(format!("{label}:{value}"))
    }
}

impl<T: Clone + Send + 'static> Recorder<T> {
    /// Callback recording every value it receives unchanged.
    pub fn sink(&self) -> impl Fn(T) + Send + Sync + 'static {
        let recorder = self.clone();
        move |value: T| recorder.push(value)
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: Clone> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
