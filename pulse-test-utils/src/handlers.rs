// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Ready-made async subscribers for dispatch-order tests.
//!
//! Every handler records `"{label}:start"` when it is invoked and
//! `"{label}:end"` (or `"{label}:failed"`) when its future completes, so a single
//! [`Recorder`] shows both invocation and completion order.

use crate::recorder::Recorder;
use crate::test_error::TestError;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

/// Boxed future returned by the handlers in this module.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), TestError>> + Send>>;

/// Handler that waits `delay` before completing successfully.
pub fn staggered<T>(
    log: &Recorder<String>,
    label: &str,
    delay: Duration,
) -> impl Fn(T) -> HandlerFuture + Send + Sync + 'static
where
    T: Send + 'static,
{
    let log = log.clone();
    let label = label.to_string();
    move |_value: T| -> HandlerFuture {
        log.push(format!("{label}:start"));
        let log = log.clone();
        let label = label.clone();
        Box::pin(async move {
            sleep(delay).await;
            log.push(format!("{label}:end"));
            Ok(())
        })
    }
}

/// Handler that waits `delay` and then fails with a [`TestError`] naming `label`.
pub fn failing_after<T>(
    log: &Recorder<String>,
    label: &str,
    delay: Duration,
) -> impl Fn(T) -> HandlerFuture + Send + Sync + 'static
where
    T: Send + 'static,
{
    let log = log.clone();
    let label = label.to_string();
    move |_value: T| -> HandlerFuture {
        log.push(format!("{label}:start"));
        let log = log.clone();
        let label = label.clone();
        Box::pin(async move {
            sleep(delay).await;
            log.push(format!("{label}:failed"));
            Err(TestError::new(label))
        })
    }
}

/// Handler that records `"{label}:{value}"` without suspending.
pub fn recording<T>(
    log: &Recorder<String>,
    label: &str,
) -> impl Fn(T) -> HandlerFuture + Send + Sync + 'static
where
    T: Display + Send + 'static,
{
    let log = log.clone();
    let label = label.to_string();
    move |value: T| -> HandlerFuture {
        log.push(format!("{label}:{value}"));
        Box::pin(async { Ok(()) })
    }
}

/// Entries of `log` ending in `suffix`, with the suffix stripped.
pub fn phase(log: &Recorder<String>, suffix: &str) -> Vec<String> {
    let suffix = format!(":{suffix}");
    log.entries()
        .into_iter()
        .filter_map(|entry| entry.strip_suffix(&suffix).map(str::to_string))
        .collect()
}
