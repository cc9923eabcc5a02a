// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use pulse_core::{
    clear_unhandled_failure_hook, panic_message, report_unhandled, set_unhandled_failure_hook,
    spawn_detached, FailureReporter, PulseError,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::timeout;

// The process-wide hook is shared by every test in this binary, so all hook
// assertions live in a single test.
#[test]
fn test_global_hook_lifecycle() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    {
        let seen = seen.clone();
        set_unhandled_failure_hook(move |err| seen.lock().push(err.to_string()));
    }
    report_unhandled(&PulseError::callback_panic("first"));

    let reporter = FailureReporter::global();
    assert!(!reporter.has_handler());
    reporter.report(&PulseError::callback_panic("second"));

    clear_unhandled_failure_hook();
    report_unhandled(&PulseError::callback_panic("logged only"));

    assert_eq!(
        *seen.lock(),
        vec![
            "User callback panicked: first".to_string(),
            "User callback panicked: second".to_string(),
        ]
    );
}

#[test]
fn test_channel_handler_takes_precedence() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reporter = {
        let seen = seen.clone();
        FailureReporter::with_handler(move |err| seen.lock().push(err.to_string()))
    };

    reporter.clone().report(&PulseError::ChannelDropped);

    assert!(reporter.has_handler());
    assert_eq!(seen.lock().len(), 1);
}

#[test]
fn test_panic_message_from_str_and_string() {
    let payload = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
    assert_eq!(panic_message(&*payload), "static message");

    let payload = std::panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
    assert_eq!(panic_message(&*payload), "formatted 42");
}

#[tokio::test]
async fn test_spawn_detached_reports_errors() {
    // Arrange
    let (tx, mut rx) = unbounded_channel();
    let reporter = FailureReporter::with_handler(move |err| {
        let _ = tx.send(err.to_string());
    });

    // Act
    spawn_detached(
        async { Err(PulseError::user_error(io::Error::other("detached failure"))) },
        reporter,
    );

    // Assert
    let reported = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("failure should be reported")
        .unwrap();
    assert_eq!(reported, "User error: detached failure");
}

async fn explode() -> pulse_core::Result<()> {
    panic!("task exploded")
}

#[tokio::test]
async fn test_spawn_detached_reports_panics() {
    let (tx, mut rx) = unbounded_channel();
    let reporter = FailureReporter::with_handler(move |err| {
        let _ = tx.send(err.clone());
    });

    spawn_detached(explode(), reporter);

    let reported = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("panic should be reported")
        .unwrap();
    assert!(matches!(reported, PulseError::CallbackPanic { ref context } if context == "task exploded"));
}

#[tokio::test]
async fn test_spawn_detached_success_reports_nothing() {
    let (tx, mut rx) = unbounded_channel::<String>();
    let reporter = FailureReporter::with_handler(move |err| {
        let _ = tx.send(err.to_string());
    });

    spawn_detached(async { Ok(()) }, reporter);

    // The reporter (and its sender) is dropped once the task finishes
    let next = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("task should finish");
    assert!(next.is_none());
}
