// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::FutureExt;
use parking_lot::Mutex;
use pulse_async::{AsyncChannel, DispatchStrategy, PulseError, SubscriptionHandle};
use pulse_test_utils::handlers::{failing_after, recording, staggered};
use pulse_test_utils::{FailureCapture, Recorder};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

async fn wait_for_failure(capture: &FailureCapture) {
    timeout(Duration::from_secs(1), async {
        while capture.is_empty() {
            sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("failure should be reported");
}

#[tokio::test]
async fn test_each_subscriber_receives_value_in_order() {
    // Arrange
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    channel.subscribe(recording(&log, "a"));
    channel.subscribe(recording(&log, "b"));

    // Act
    channel.emit(5).await.unwrap();

    // Assert
    assert_eq!(log.entries(), vec!["a:5", "b:5"]);
    assert_eq!(channel.value(), Some(5));
}

#[tokio::test]
async fn test_unsubscribe_is_idempotent() {
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    let a = channel.subscribe(recording(&log, "a"));
    channel.subscribe(recording(&log, "b"));

    assert!(a.unsubscribe());
    assert!(!a.unsubscribe());
    assert!(!channel.unsubscribe(a.id()));
    channel.emit(1).await.unwrap();

    assert_eq!(log.entries(), vec!["b:1"]);
}

#[tokio::test]
async fn test_subscribe_once_fires_only_once() {
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    channel.subscribe_once(recording(&log, "once"));

    channel.emit(1).await.unwrap();
    channel.emit(2).await.unwrap();

    assert_eq!(log.entries(), vec!["once:1"]);
    assert!(channel.is_empty());
}

#[tokio::test]
async fn test_subscribe_once_concurrent_fires_once_for_overlapping_emissions() {
    let channel = AsyncChannel::<u32>::with_strategy(DispatchStrategy::Concurrent);
    let log = Recorder::<String>::new();
    channel.subscribe_once(recording(&log, "once"));

    let first = channel.emit(1);
    let second = channel.emit(2);
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(log.entries(), vec!["once:1"]);
}

#[tokio::test]
async fn test_subscriber_removed_mid_sequential_dispatch_is_skipped() {
    // Arrange
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    let victim: Arc<Mutex<Option<SubscriptionHandle>>> = Arc::new(Mutex::new(None));
    {
        let log = log.clone();
        let victim = victim.clone();
        channel.subscribe(move |v: u32| {
            log.push(format!("a:{v}"));
            let victim = victim.clone();
            async move {
                if let Some(handle) = victim.lock().take() {
                    handle.unsubscribe();
                }
                Ok::<(), std::io::Error>(())
            }
        });
    }
    *victim.lock() = Some(channel.subscribe(recording(&log, "b")));
    channel.subscribe(recording(&log, "c"));

    // Act
    channel.emit(1).await.unwrap();

    // Assert
    assert_eq!(log.entries(), vec!["a:1", "c:1"]);
}

#[tokio::test]
async fn test_subscriber_added_during_dispatch_waits_for_next_emit() {
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    {
        let log = log.clone();
        let inner = channel.clone();
        channel.subscribe_once(move |v: u32| {
            log.push(format!("outer:{v}"));
            inner.subscribe(recording(&log, "added"));
            async { Ok::<(), std::io::Error>(()) }
        });
    }

    channel.emit(1).await.unwrap();
    channel.emit(2).await.unwrap();

    assert_eq!(log.entries(), vec!["outer:1", "added:2"]);
}

#[tokio::test]
async fn test_reentrant_emit_is_awaited_inside_handler() {
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    {
        let log = log.clone();
        let inner = channel.clone();
        channel.subscribe(move |v: u32| {
            log.push(format!("a:{v}"));
            let inner = inner.clone();
            async move {
                if v == 1 {
                    inner.emit(10).await?;
                }
                Ok::<(), PulseError>(())
            }
        });
    }
    channel.subscribe(recording(&log, "b"));

    channel.emit(1).await.unwrap();

    assert_eq!(log.entries(), vec!["a:1", "a:10", "b:10", "b:1"]);
    assert_eq!(channel.value(), Some(10));
}

#[tokio::test]
async fn test_subscribe_immediate_replays_and_awaits() {
    // Arrange
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();
    channel.emit(3).await.unwrap();

    // Act
    channel
        .subscribe_immediate(staggered(&log, "late", Duration::from_millis(5)))
        .await;

    // Assert
    assert_eq!(log.entries(), vec!["late:start", "late:end"]);
}

#[tokio::test]
async fn test_subscribe_immediate_without_value_does_not_call() {
    let channel = AsyncChannel::<u32>::new();
    let log = Recorder::<String>::new();

    let handle = channel.subscribe_immediate(recording(&log, "late")).await;
    assert!(log.is_empty());

    channel.emit(4).await.unwrap();
    assert_eq!(log.entries(), vec!["late:4"]);
    assert!(handle.is_active());
}

#[tokio::test]
async fn test_subscribe_immediate_failed_replay_is_reported() {
    let capture = FailureCapture::new();
    let channel = AsyncChannel::<u32>::with_failure_handler(capture.handler());
    let log = Recorder::<String>::new();
    channel.emit(1).await.unwrap();

    let handle = channel
        .subscribe_immediate(failing_after(&log, "replay", Duration::from_millis(1)))
        .await;

    assert!(handle.is_active());
    assert_eq!(
        capture.messages(),
        vec!["User error: test handler failed: replay"]
    );
}

#[tokio::test]
async fn test_next_event_resolves_with_next_emission() {
    let channel = AsyncChannel::<u32>::new();
    channel.emit(1).await.unwrap();
    let next = channel.next_event();

    channel.emit(2).await.unwrap();

    assert_eq!(next.await.unwrap(), 2);
    assert!(channel.is_empty());
}

#[tokio::test]
async fn test_next_event_from_detached_emission() {
    let channel = AsyncChannel::<u32>::with_strategy(DispatchStrategy::Concurrent);
    let next = channel.next_event();

    channel.emit_detached(7);

    let value = timeout(Duration::from_secs(1), next).await.unwrap();
    assert_eq!(value.unwrap(), 7);
}

#[tokio::test]
async fn test_next_event_fails_when_channel_dropped() {
    let channel = AsyncChannel::<u32>::new();
    let next = channel.next_event();

    drop(channel);

    assert!(matches!(next.await, Err(PulseError::ChannelDropped)));
}

#[tokio::test]
async fn test_first_resolves_once_emitted() {
    let channel = AsyncChannel::<u32>::new();
    let mut first = channel.first();
    assert!((&mut first).now_or_never().is_none());

    let _pending = channel.emit(1);

    assert!(first.now_or_never().is_some());
    assert!(channel.first().is_ready());
    assert_eq!(channel.subscriber_count(), 0);
}

#[tokio::test]
async fn test_detached_emission_failure_is_reported() {
    // Arrange
    let capture = FailureCapture::new();
    let channel = AsyncChannel::<u32>::with_failure_handler(capture.handler());
    let log = Recorder::<String>::new();
    channel.subscribe(failing_after(&log, "detached", Duration::from_millis(1)));

    // Act
    channel.emit(1).detach();
    wait_for_failure(&capture).await;

    // Assert
    assert_eq!(
        capture.messages(),
        vec!["User error: test handler failed: detached"]
    );
}

#[tokio::test]
async fn test_detached_concurrent_failures_reported_once_bundled() {
    let capture = FailureCapture::new();
    let channel = AsyncChannel::<u32>::with_strategy_and_failure_handler(
        DispatchStrategy::Concurrent,
        capture.handler(),
    );
    let log = Recorder::<String>::new();
    channel.subscribe(failing_after(&log, "x", Duration::from_millis(1)));
    channel.subscribe(failing_after(&log, "y", Duration::from_millis(2)));

    channel.emit_detached(1);
    wait_for_failure(&capture).await;
    sleep(Duration::from_millis(10)).await;

    assert_eq!(capture.count(), 1);
    assert_eq!(capture.errors()[0].failure_count(), 2);
}

#[tokio::test]
async fn test_clones_share_state() {
    let channel = AsyncChannel::<u32>::with_strategy(DispatchStrategy::Concurrent);
    let clone = channel.clone();
    let log = Recorder::<String>::new();
    channel.subscribe(recording(&log, "a"));

    clone.emit(2).await.unwrap();

    assert_eq!(log.entries(), vec!["a:2"]);
    assert_eq!(clone.strategy(), DispatchStrategy::Concurrent);
    assert!(channel.has_value());
}

#[tokio::test]
async fn test_debug_output() {
    let channel = AsyncChannel::<u32>::with_strategy(DispatchStrategy::Concurrent);

    let debug = format!("{channel:?}");

    assert!(debug.contains("strategy: Concurrent"));
    assert!(debug.contains("subscribers: 0"));
}
