//! Concurrency tests for the client registry.
//!
//! These tests verify that registration, unregistration and broadcast
//! can run from many tasks at once without losing or leaking clients.

use std::sync::Arc;

use exchange_hub::chat::ClientRegistry;

/// Register and unregister many clients concurrently.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_register_unregister_leaves_registry_empty() {
    let registry = Arc::new(ClientRegistry::new());

    const NUM_CLIENTS: usize = 100;

    let mut handles = Vec::new();
    for _ in 0..NUM_CLIENTS {
        let registry = Arc::clone(&registry);
        handles.push(tokio::spawn(async move {
            let (handle, _outbox) = registry.register();
            tokio::task::yield_now().await;
            registry.unregister(&handle)
        }));
    }

    let mut removed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            removed += 1;
        }
    }

    assert_eq!(removed, NUM_CLIENTS, "Every client should be removed once");
    assert!(registry.is_empty());
    assert_eq!(registry.broadcast_all("hello?"), 0);
}

/// Broadcast while clients come and go.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_broadcast_during_churn() {
    let registry = Arc::new(ClientRegistry::new());
    let (_stable, mut stable_outbox) = registry.register_named("Stable");

    const ROUNDS: usize = 50;

    let churn = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            for _ in 0..ROUNDS {
                let (client, _outbox) = registry.join();
                tokio::task::yield_now().await;
                drop(client);
            }
        })
    };

    let broadcaster = {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            let mut delivered = Vec::new();
            for i in 0..ROUNDS {
                delivered.push(registry.broadcast_all(&format!("round {i}")));
                tokio::task::yield_now().await;
            }
            delivered
        })
    };

    churn.await.unwrap();
    let delivered = broadcaster.await.unwrap();

    // The stable client is always present; a churning one may or may not be.
    assert!(delivered.iter().all(|&n| (1..=2).contains(&n)));
    assert_eq!(registry.len(), 1);

    for i in 0..ROUNDS {
        assert_eq!(stable_outbox.recv().await.unwrap(), format!("round {i}"));
    }
}

/// Double removal from concurrent paths removes the client only once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_double_unregister() {
    let registry = Arc::new(ClientRegistry::new());
    let (handle, _outbox) = registry.register();

    let first = {
        let registry = Arc::clone(&registry);
        let handle = handle.clone();
        tokio::spawn(async move { registry.unregister(&handle) })
    };
    let second = {
        let registry = Arc::clone(&registry);
        let handle = handle.clone();
        tokio::spawn(async move { registry.unregister(&handle) })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    assert_eq!(results.iter().filter(|&&removed| removed).count(), 1);
    assert!(registry.is_empty());
}
