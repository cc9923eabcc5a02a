// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Building blocks shared by the Pulse channel crates.
//!
//! `pulse-sync` and `pulse-async` each implement their own channel type; the pieces
//! they have in common live here:
//!
//! - [`PulseError`] and the crate-wide [`Result`] alias
//! - [`SubscriptionId`] and [`SubscriptionHandle`], returned by every subscribe call
//! - [`SubscriberRegistry`], the token-keyed, insertion-ordered subscriber table
//! - [`Latch`] / [`FirstEmission`], the one-way flag behind `first()`
//! - [`NextEvent`], the future behind `next_event()`
//! - [`FailureReporter`], the path taken by failures nobody is awaiting
//! - [`spawn_detached`], fire-and-forget spawning on the configured runtime

extern crate alloc;

#[macro_use]
mod logging;

pub mod error;
pub mod failure;
pub mod latch;
pub mod next_event;
pub mod registry;
pub mod subscription;
pub mod task;

pub use self::error::{IntoPulseError, PulseError, Result, ResultExt};
pub use self::failure::{
    clear_unhandled_failure_hook, panic_message, report_unhandled, set_unhandled_failure_hook,
    FailureHandler, FailureReporter,
};
pub use self::latch::{FirstEmission, Latch};
pub use self::next_event::{EventSlot, NextEvent};
pub use self::registry::SubscriberRegistry;
pub use self::subscription::{SubscriptionHandle, SubscriptionId, Unsubscribe};
pub use self::task::spawn_detached;
