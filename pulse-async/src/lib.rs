// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Asynchronous typed event channel.
//!
//! An [`AsyncChannel<T>`] calls handlers that return futures. [`emit`](AsyncChannel::emit)
//! returns an [`Emission`]: await it to wait until every handler is done and get
//! their failure, or [`detach`](Emission::detach) it to let it run on its own.
//!
//! ## Dispatch strategies
//!
//! | Strategy | Start order | Completion | On failure |
//! |----------|-------------|------------|------------|
//! | [`Sequential`](DispatchStrategy::Sequential) (default) | subscription order | subscription order | stops, returns the error |
//! | [`Concurrent`](DispatchStrategy::Concurrent) | subscription order | any order | waits for all, returns the error(s) |
//!
//! ## Example
//!
//! ```
//! use pulse_async::{AsyncChannel, DispatchStrategy};
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> pulse_async::Result<()> {
//! let channel = AsyncChannel::<u32>::with_strategy(DispatchStrategy::Sequential);
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let slow = log.clone();
//! channel.subscribe(move |v| {
//!     let slow = slow.clone();
//!     async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         slow.lock().unwrap().push(format!("first:{v}"));
//!         Ok::<(), std::io::Error>(())
//!     }
//! });
//! let fast = log.clone();
//! channel.subscribe(move |v| {
//!     let fast = fast.clone();
//!     async move {
//!         tokio::time::sleep(Duration::from_millis(1)).await;
//!         fast.lock().unwrap().push(format!("second:{v}"));
//!         Ok::<(), std::io::Error>(())
//!     }
//! });
//!
//! channel.emit(1).await?;
//!
//! assert_eq!(*log.lock().unwrap(), vec!["first:1", "second:1"]);
//! # Ok(())
//! # }
//! ```

extern crate alloc;

#[macro_use]
mod logging;

pub mod async_channel;
pub mod dispatch_strategy;
pub mod emission;

pub use async_channel::AsyncChannel;
pub use dispatch_strategy::DispatchStrategy;
pub use emission::Emission;
pub use pulse_core::{
    FirstEmission, NextEvent, PulseError, Result, SubscriptionHandle, SubscriptionId,
};
