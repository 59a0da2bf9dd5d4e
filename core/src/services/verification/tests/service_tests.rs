//! End-to-end tests of the verification service with in-memory storage

use std::sync::Arc;

use crate::repositories::InMemoryVerificationCodeRepository;
use crate::services::verification::{
    NotificationRegistry, VerificationService, VerificationServiceConfig,
};

use super::mocks::MockDispatcher;

const VERIFIABLE: &str = "john@example.com";

fn service(
    config: VerificationServiceConfig,
) -> (
    VerificationService<InMemoryVerificationCodeRepository, MockDispatcher>,
    Arc<InMemoryVerificationCodeRepository>,
    Arc<MockDispatcher>,
) {
    let repository = Arc::new(InMemoryVerificationCodeRepository::new());
    let dispatcher = Arc::new(MockDispatcher::new(false));
    let service = VerificationService::new(
        repository.clone(),
        dispatcher.clone(),
        NotificationRegistry::new(),
        config,
    );
    (service, repository, dispatcher)
}

#[tokio::test]
async fn test_send_then_verify() {
    let (service, repository, dispatcher) = service(VerificationServiceConfig::default());

    service.send(VERIFIABLE).await.unwrap();
    let code = dispatcher.last_code_for(VERIFIABLE).unwrap();

    assert!(service.verify(&code, VERIFIABLE).await.unwrap());
    assert!(repository.is_empty().await);
    assert!(!service.verify(&code, VERIFIABLE).await.unwrap());
}

#[tokio::test]
async fn test_only_latest_code_verifies() {
    let (service, repository, dispatcher) = service(VerificationServiceConfig::default());

    let mut codes = Vec::new();
    for _ in 0..3 {
        service.send(VERIFIABLE).await.unwrap();
        codes.push(dispatcher.last_code_for(VERIFIABLE).unwrap());
    }
    assert_eq!(repository.len().await, 1);

    let latest = codes.pop().unwrap();
    for code in codes.iter().filter(|c| **c != latest) {
        assert!(!service.verify(code, VERIFIABLE).await.unwrap());
    }
    assert!(service.verify(&latest, VERIFIABLE).await.unwrap());
}

#[tokio::test]
async fn test_test_verifiable_round_trip() {
    let config = VerificationServiceConfig::default()
        .with_test_verifiables(["test@example.com"], "T");
    let (service, repository, dispatcher) = service(config);

    assert!(service.send("test@example.com").await.unwrap().is_test_bypass());
    assert!(service.verify("T", "test@example.com").await.unwrap());
    assert!(repository.is_empty().await);
    assert!(dispatcher.dispatched().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_succeeds_once() {
    let (service, _repository, dispatcher) = service(VerificationServiceConfig::default());
    let service = Arc::new(service);

    service.send(VERIFIABLE).await.unwrap();
    let code = dispatcher.last_code_for(VERIFIABLE).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let code = code.clone();
            tokio::spawn(async move { service.verify(&code, VERIFIABLE).await.unwrap() })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_verifiables_are_independent() {
    let (service, _repository, dispatcher) = service(VerificationServiceConfig::default());

    service.send("a@example.com").await.unwrap();
    service.send("b@example.com").await.unwrap();

    let code_a = dispatcher.last_code_for("a@example.com").unwrap();
    let code_b = dispatcher.last_code_for("b@example.com").unwrap();

    assert!(service.verify(&code_b, "b@example.com").await.unwrap());
    assert!(service.verify(&code_a, "a@example.com").await.unwrap());
}
