use vc_core::VerificationCodeCreated;

use crate::notification::{DeliveryEnvelope, LogTransport, NotificationTransport};
use crate::InfrastructureError;

fn envelope(code: &str) -> DeliveryEnvelope {
    DeliveryEnvelope::from_notification("john@example.com", &VerificationCodeCreated::new(code))
}

#[tokio::test]
async fn test_default_transport_keeps_no_history() {
    let transport = LogTransport::new();

    for code in ["111111", "222222", "333333"] {
        let message_id = transport.deliver(&envelope(code)).await.unwrap();
        assert!(message_id.starts_with("log_"));
    }

    assert_eq!(transport.get_message_count(), 3);
    assert!(transport.delivered().is_empty());
}

#[tokio::test]
async fn test_recording_transport_keeps_envelopes() {
    let transport = LogTransport::recording();

    transport.deliver(&envelope("111111")).await.unwrap();
    transport.deliver(&envelope("222222")).await.unwrap();

    let codes: Vec<_> = transport.delivered().into_iter().map(|e| e.code).collect();
    assert_eq!(codes, vec!["111111".to_string(), "222222".to_string()]);
}

#[tokio::test]
async fn test_simulated_failure() {
    let transport = LogTransport::recording().with_simulated_failure(true);

    let result = transport.deliver(&envelope("111111")).await;

    assert!(matches!(result, Err(InfrastructureError::Delivery(_))));
    assert_eq!(transport.get_message_count(), 0);
    assert!(transport.delivered().is_empty());
}

#[tokio::test]
async fn test_console_output_still_delivers() {
    let transport = LogTransport::recording().with_console_output(true);

    transport.deliver(&envelope("111111")).await.unwrap();

    assert_eq!(transport.get_message_count(), 1);
    assert_eq!(transport.delivered().len(), 1);
}
