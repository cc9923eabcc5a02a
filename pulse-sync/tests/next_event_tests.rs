// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::FutureExt;
use pulse_sync::{PulseError, SyncChannel};
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[tokio::test]
async fn test_next_event_resolves_with_next_emission() {
    // Arrange
    let channel = SyncChannel::<u32>::new();
    channel.emit(1);
    let next = channel.next_event();

    // Act
    channel.emit(2);
    channel.emit(3);

    // Assert
    assert_eq!(next.await.unwrap(), 2);
}

#[tokio::test]
async fn test_next_event_does_not_resolve_from_past_value() {
    let channel = SyncChannel::<u32>::new();
    channel.emit(1);

    let mut next = channel.next_event();

    assert!((&mut next).now_or_never().is_none());
    channel.emit(2);
    assert_eq!(next.await.unwrap(), 2);
}

#[tokio::test]
async fn test_independent_next_event_futures() {
    let channel = SyncChannel::<u32>::new();
    let first = channel.next_event();
    let second = channel.next_event();

    channel.emit(8);

    assert_eq!(first.await.unwrap(), 8);
    assert_eq!(second.await.unwrap(), 8);
    assert!(channel.is_empty());
}

#[tokio::test]
async fn test_next_event_across_tasks() {
    let channel = SyncChannel::<u32>::new();
    let next = channel.next_event();

    let emitter = channel.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(5)).await;
        emitter.emit(42);
    });

    let value = timeout(Duration::from_secs(1), next).await.unwrap();
    assert_eq!(value.unwrap(), 42);
}

#[tokio::test]
async fn test_dropped_next_event_unsubscribes() {
    let channel = SyncChannel::<u32>::new();

    let next = channel.next_event();
    assert_eq!(channel.subscriber_count(), 1);
    drop(next);

    assert_eq!(channel.subscriber_count(), 0);
}

#[tokio::test]
async fn test_next_event_fails_when_channel_dropped() {
    let channel = SyncChannel::<u32>::new();
    let next = channel.next_event();

    drop(channel);

    assert!(matches!(next.await, Err(PulseError::ChannelDropped)));
}

#[tokio::test]
async fn test_first_resolves_on_first_emission() {
    // Arrange
    let channel = SyncChannel::<u32>::new();
    let mut first = channel.first();
    assert!(!first.is_ready());
    assert!((&mut first).now_or_never().is_none());

    // Act
    channel.emit(1);

    // Assert
    timeout(Duration::from_secs(1), first).await.unwrap();
}

#[tokio::test]
async fn test_first_resolves_immediately_after_emission() {
    let channel = SyncChannel::<u32>::new();
    channel.emit(1);

    let first = channel.first();

    assert!(first.is_ready());
    assert!(first.now_or_never().is_some());
}

#[tokio::test]
async fn test_first_does_not_count_as_subscriber() {
    let channel = SyncChannel::<u32>::new();

    let _first = channel.first();

    assert_eq!(channel.subscriber_count(), 0);
}

#[tokio::test]
async fn test_first_wakes_every_waiter() {
    let channel = SyncChannel::<u32>::new();
    let waiters: Vec<_> = (0..4)
        .map(|_| tokio::spawn(channel.first()))
        .collect();

    sleep(Duration::from_millis(5)).await;
    channel.emit(1);

    for waiter in waiters {
        timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }
}
