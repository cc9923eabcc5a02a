// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic fire-and-forget spawning.
//!
//! Fire-and-forget work (async subscribers of a `SyncChannel`, detached emissions of
//! an `AsyncChannel`) is handed to the configured runtime and never joined. Its
//! outcome is routed to a [`FailureReporter`]: an `Err` is reported as-is, a panic
//! as [`PulseError::CallbackPanic`].
//!
//! # Runtime Support
//!
//! - **Tokio**: `tokio::spawn` (default, `runtime-tokio`)
//! - **smol**: `smol::spawn(..).detach()` (`runtime-smol`)
//!
//! With both enabled, Tokio wins.

use crate::{panic_message, FailureReporter, PulseError, Result};
use core::future::Future;
use core::panic::AssertUnwindSafe;
use futures::FutureExt;

/// Spawn `future` detached, reporting its failure (error or panic) to `reporter`.
///
/// # Panics
///
/// With `runtime-tokio`, panics if called outside a Tokio runtime, like `tokio::spawn`.
pub fn spawn_detached<Fut>(future: Fut, reporter: FailureReporter)
where
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let task = async move {
        let outcome = AssertUnwindSafe(future).catch_unwind().await;
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(error)) => Some(error),
            Err(payload) => Some(PulseError::callback_panic(panic_message(&*payload))),
        };
        if let Some(error) = failure {
            reporter.report(&error);
        }
    };

    #[cfg(feature = "runtime-tokio")]
    {
        tokio::spawn(task);
    }

    #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
    {
        smol::spawn(task).detach();
    }

    #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-smol")))]
    {
        // No runtime configured: drive the work to completion on this thread
        futures::executor::block_on(task);
    }
}
