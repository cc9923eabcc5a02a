// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pulse::prelude::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Order {
    id: u32,
    total_cents: u64,
}

#[tokio::test]
async fn test_order_flow_example() -> anyhow::Result<()> {
    // Orders are placed synchronously by the UI layer
    let placed = SyncChannel::<Order>::new();

    // Large orders are reviewed asynchronously, one reviewer after another
    let review = AsyncChannel::<Order>::new();
    let audit = Arc::new(Mutex::new(Vec::new()));

    let fraud_log = audit.clone();
    review.subscribe(move |order: Order| {
        let fraud_log = fraud_log.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            fraud_log.lock().unwrap().push(format!("fraud-check:{}", order.id));
            Ok::<(), std::io::Error>(())
        }
    });
    let billing_log = audit.clone();
    review.subscribe(move |order: Order| {
        let billing_log = billing_log.clone();
        async move {
            billing_log.lock().unwrap().push(format!("billing:{}", order.id));
            Ok::<(), std::io::Error>(())
        }
    });

    let large = placed.pipe();
    let reviewer = review.clone();
    large.subscribe(move |order: Order| {
        if order.total_cents >= 10_000 {
            reviewer.emit_detached(order);
        }
    });

    let reviewed = review.next_event();
    placed.emit(Order {
        id: 1,
        total_cents: 500,
    });
    placed.emit(Order {
        id: 2,
        total_cents: 25_000,
    });

    assert_eq!(reviewed.await?.id, 2);
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(
        *audit.lock().unwrap(),
        vec!["fraud-check:2".to_string(), "billing:2".to_string()]
    );
    assert_eq!(placed.value().map(|order| order.id), Some(2));
    Ok(())
}
