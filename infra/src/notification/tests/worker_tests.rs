use std::sync::Arc;
use tokio_test::assert_ok;

use vc_core::VerificationCodeCreated;

use crate::notification::{
    DeliveryEnvelope, DeliveryQueue, InMemoryDeliveryQueue, LogTransport, QueueWorker,
    QueueWorkerConfig,
};

fn envelope(code: &str) -> DeliveryEnvelope {
    let mut envelope = DeliveryEnvelope::from_notification(
        "john@example.com",
        &VerificationCodeCreated::new(code),
    );
    envelope.queue = Some("mail".to_string());
    envelope
}

fn worker(
    transport: Arc<LogTransport>,
    queue: Arc<InMemoryDeliveryQueue>,
) -> QueueWorker<LogTransport, InMemoryDeliveryQueue> {
    QueueWorker::new(
        transport,
        queue,
        "mail",
        QueueWorkerConfig {
            poll_interval_ms: 10,
            max_attempts: 3,
        },
    )
}

#[tokio::test]
async fn test_run_once_on_empty_queue() {
    let worker = worker(
        Arc::new(LogTransport::recording()),
        Arc::new(InMemoryDeliveryQueue::new()),
    );
    assert!(!worker.run_once().await.unwrap());
}

#[tokio::test]
async fn test_worker_delivers_queued_envelopes_in_order() {
    let transport = Arc::new(LogTransport::recording());
    let queue = Arc::new(InMemoryDeliveryQueue::new());
    queue.push("mail", &envelope("111111")).await.unwrap();
    queue.push("mail", &envelope("222222")).await.unwrap();

    let worker = worker(transport.clone(), queue.clone());

    assert_eq!(assert_ok!(worker.run_until_empty().await), 2);
    let codes: Vec<_> = transport.delivered().into_iter().map(|e| e.code).collect();
    assert_eq!(codes, vec!["111111", "222222"]);
    assert_eq!(queue.len("mail").await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_delivery_is_requeued_then_dropped() {
    let transport = Arc::new(LogTransport::recording().with_simulated_failure(true));
    let queue = Arc::new(InMemoryDeliveryQueue::new());
    queue.push("mail", &envelope("111111")).await.unwrap();

    let worker = worker(transport.clone(), queue.clone());

    assert!(worker.run_once().await.unwrap());
    let requeued = queue.pop("mail").await.unwrap().unwrap();
    assert_eq!(requeued.attempts, 1);
    queue.push("mail", &requeued).await.unwrap();

    // Second failure requeues, third drops
    assert_eq!(worker.run_until_empty().await.unwrap(), 2);
    assert_eq!(queue.len("mail").await.unwrap(), 0);
    assert_eq!(transport.get_message_count(), 0);
}

#[tokio::test]
async fn test_background_task_drains_queue() {
    let transport = Arc::new(LogTransport::recording());
    let queue = Arc::new(InMemoryDeliveryQueue::new());
    let handle = Arc::new(worker(transport.clone(), queue.clone())).start_background_task();

    queue.push("mail", &envelope("111111")).await.unwrap();

    for _ in 0..100 {
        if transport.get_message_count() == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    handle.abort();

    assert_eq!(transport.get_message_count(), 1);
}
