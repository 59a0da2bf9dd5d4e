//! Mock implementations for testing verification services

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::verification_code::{NewVerificationCode, VerificationCode};
use crate::errors::DomainError;
use crate::repositories::VerificationCodeRepository;
use crate::services::verification::{NotificationDispatcher, VerificationCodeNotification};

/// A notification as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedNotification {
    pub verifiable: String,
    pub name: String,
    pub code: String,
    pub queue: Option<String>,
}

// Dispatcher recording every notification it receives
pub struct MockDispatcher {
    pub dispatched: Arc<Mutex<Vec<DispatchedNotification>>>,
    pub should_fail: bool,
}

impl MockDispatcher {
    pub fn new(should_fail: bool) -> Self {
        Self {
            dispatched: Arc::new(Mutex::new(Vec::new())),
            should_fail,
        }
    }

    pub fn dispatched(&self) -> Vec<DispatchedNotification> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn last_code_for(&self, verifiable: &str) -> Option<String> {
        self.dispatched
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|n| n.verifiable == verifiable)
            .map(|n| n.code.clone())
    }
}

#[async_trait]
impl NotificationDispatcher for MockDispatcher {
    async fn dispatch(
        &self,
        verifiable: &str,
        notification: &dyn VerificationCodeNotification,
    ) -> Result<(), DomainError> {
        if self.should_fail {
            return Err(DomainError::Internal {
                message: "Mail transport unavailable".to_string(),
            });
        }
        self.dispatched.lock().unwrap().push(DispatchedNotification {
            verifiable: verifiable.to_string(),
            name: notification.name().to_string(),
            code: notification.code().to_string(),
            queue: notification.queue().map(str::to_string),
        });
        Ok(())
    }
}

// Repository whose every operation fails
pub struct FailingRepository;

impl FailingRepository {
    fn error() -> DomainError {
        DomainError::Internal {
            message: "Database unavailable".to_string(),
        }
    }
}

#[async_trait]
impl VerificationCodeRepository for FailingRepository {
    async fn insert(&self, _code: NewVerificationCode) -> Result<VerificationCode, DomainError> {
        Err(Self::error())
    }

    async fn delete_for_verifiable(&self, _verifiable: &str) -> Result<u64, DomainError> {
        Err(Self::error())
    }

    async fn find_valid(
        &self,
        _verifiable: &str,
        _code: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        Err(Self::error())
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, DomainError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<VerificationCode>, DomainError> {
        Err(Self::error())
    }

    async fn find_by_verifiable(
        &self,
        _verifiable: &str,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        Err(Self::error())
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> Result<u64, DomainError> {
        Err(Self::error())
    }
}
