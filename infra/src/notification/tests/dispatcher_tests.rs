use std::sync::Arc;

use vc_core::{NotificationDispatcher, VerificationCodeCreated, VerificationCodeNotification};

use crate::notification::{DeliveryQueue, InMemoryDeliveryQueue, LogTransport, QueueingDispatcher};

fn dispatcher(
    transport: LogTransport,
) -> (
    QueueingDispatcher<LogTransport, InMemoryDeliveryQueue>,
    Arc<LogTransport>,
    Arc<InMemoryDeliveryQueue>,
) {
    let transport = Arc::new(transport);
    let queue = Arc::new(InMemoryDeliveryQueue::new());
    (
        QueueingDispatcher::new(transport.clone(), queue.clone()),
        transport,
        queue,
    )
}

#[tokio::test]
async fn test_dispatch_without_queue_delivers_inline() {
    let (dispatcher, transport, queue) = dispatcher(LogTransport::recording());

    dispatcher
        .dispatch("john@example.com", &VerificationCodeCreated::new("123456"))
        .await
        .unwrap();

    assert_eq!(transport.get_message_count(), 1);
    let delivered = transport.delivered();
    assert_eq!(delivered[0].verifiable, "john@example.com");
    assert_eq!(delivered[0].code, "123456");
    assert_eq!(queue.len("mail").await.unwrap(), 0);
}

#[tokio::test]
async fn test_dispatch_with_queue_defers_delivery() {
    let (dispatcher, transport, queue) = dispatcher(LogTransport::recording());

    let mut notification = VerificationCodeCreated::new("123456");
    notification.set_queue(Some("mail".to_string()));
    dispatcher.dispatch("john@example.com", &notification).await.unwrap();

    assert_eq!(transport.get_message_count(), 0);
    assert_eq!(queue.len("mail").await.unwrap(), 1);

    let queued = queue.pop("mail").await.unwrap().unwrap();
    assert_eq!(queued.code, "123456");
    assert_eq!(queued.queue.as_deref(), Some("mail"));
}

#[tokio::test]
async fn test_inline_delivery_failure_is_internal_error() {
    let (dispatcher, _transport, _queue) =
        dispatcher(LogTransport::recording().with_simulated_failure(true));

    let error = dispatcher
        .dispatch("john@example.com", &VerificationCodeCreated::new("123456"))
        .await
        .unwrap_err();

    assert!(matches!(error, vc_core::DomainError::Internal { .. }));
}
