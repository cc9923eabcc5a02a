// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Synchronous typed event channel.
//!
//! A [`SyncChannel<T>`] holds an ordered list of callbacks and calls every one of
//! them with a clone of the value passed to [`emit`](SyncChannel::emit).
//!
//! ## Characteristics
//!
//! - **Synchronous**: `emit` returns after every subscriber has run.
//! - **Ordered**: subscribers run in subscription order.
//! - **Snapshot dispatch**: subscribers added during an emission wait for the next
//!   one; subscribers removed during an emission are skipped if they have not run.
//! - **Replay**: the last value is kept and can be replayed to new subscribers.
//! - **Isolated failures**: a panicking subscriber is reported, not propagated.
//!
//! ## Example
//!
//! ```
//! use pulse_sync::SyncChannel;
//! use std::sync::{Arc, Mutex};
//!
//! let channel = SyncChannel::<u32>::new();
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let a = log.clone();
//! channel.subscribe(move |v| a.lock().unwrap().push(format!("a:{v}")));
//! let b = log.clone();
//! channel.subscribe(move |v| b.lock().unwrap().push(format!("b:{v}")));
//!
//! channel.emit(5);
//!
//! assert_eq!(*log.lock().unwrap(), vec!["a:5", "b:5"]);
//! assert_eq!(channel.value(), Some(5));
//! ```
//!
//! ## Derived channels
//!
//! ```
//! use pulse_sync::SyncChannel;
//!
//! let celsius = SyncChannel::<f64>::new();
//! let fahrenheit = celsius.pipe_map(|c| c * 9.0 / 5.0 + 32.0);
//!
//! celsius.emit(100.0);
//! assert_eq!(fahrenheit.value(), Some(212.0));
//! ```

extern crate alloc;

#[macro_use]
mod logging;

pub mod sync_channel;

pub use pulse_core::{
    FirstEmission, NextEvent, PulseError, Result, SubscriptionHandle, SubscriptionId,
};
pub use sync_channel::SyncChannel;
