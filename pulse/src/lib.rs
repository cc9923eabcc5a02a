// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Pulse
//!
//! Typed publish/subscribe event channels.
//!
//! ## Overview
//!
//! Each channel carries one kind of event, `T`, from whoever calls `emit` to every
//! subscribed callback. Two flavours share the same contract:
//!
//! - [`SyncChannel`]: callbacks are plain functions, `emit` runs all of them before
//!   returning.
//! - [`AsyncChannel`]: callbacks return futures, `emit` returns an [`Emission`] to
//!   await, dispatched one after another or all at once ([`DispatchStrategy`]).
//!
//! Both keep the last emitted value, offer one-shot subscriptions, a `next_event`
//! future, a `first` future, and derived channels through `pipe`/`pipe_map`.
//! Subscriptions are removed through the [`SubscriptionHandle`] returned when
//! subscribing, or by [`SubscriptionId`].
//!
//! ## Failures
//!
//! A subscriber failure never stops the emitter. Failures the caller of `emit`
//! cannot observe go to the channel's failure handler, else to the process-wide
//! hook ([`set_unhandled_failure_hook`]), else to the log.
//!
//! ## Quick Start
//!
//! ```rust
//! use pulse::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> pulse::Result<()> {
//!     let clicks = SyncChannel::<(i32, i32)>::new();
//!     let xs = clicks.pipe_map(|(x, _)| x);
//!
//!     let next = xs.next_event();
//!     clicks.emit((3, 4));
//!
//!     assert_eq!(next.await?, 3);
//!     assert_eq!(clicks.value(), Some((3, 4)));
//!
//!     let saves = AsyncChannel::<String>::with_strategy(DispatchStrategy::Concurrent);
//!     saves.subscribe(|doc: String| async move {
//!         assert_eq!(doc, "draft");
//!         Ok::<(), std::io::Error>(())
//!     });
//!     saves.emit("draft".to_string()).await?;
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use pulse_core::{
    clear_unhandled_failure_hook, set_unhandled_failure_hook, FirstEmission, IntoPulseError,
    NextEvent, PulseError, Result, ResultExt, SubscriptionHandle, SubscriptionId,
};

// Re-export the channels
pub use pulse_async::{AsyncChannel, DispatchStrategy, Emission};
pub use pulse_sync::SyncChannel;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AsyncChannel, DispatchStrategy, SyncChannel};
    pub use pulse_core::{PulseError, ResultExt, SubscriptionHandle, SubscriptionId};
}
