// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// How an [`AsyncChannel`](crate::AsyncChannel) runs its handlers for one emission.
///
/// Fixed when the channel is constructed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchStrategy {
    /// One handler at a time, in subscription order, each awaited before the next
    /// starts. The first failure ends the emission.
    #[default]
    Sequential,

    /// Every handler is started, in subscription order, before any is awaited; the
    /// emission completes once all of them have settled.
    Concurrent,
}

impl DispatchStrategy {
    #[must_use]
    pub fn is_concurrent(self) -> bool {
        matches!(self, Self::Concurrent)
    }
}

impl fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Concurrent => f.write_str("concurrent"),
        }
    }
}
