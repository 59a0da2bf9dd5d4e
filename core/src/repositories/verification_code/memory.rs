//! In-memory implementation of VerificationCodeRepository
//!
//! Useful for development and tests. All operations take a single lock, so
//! `delete_by_id` is atomic with respect to concurrent verifications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_code::{NewVerificationCode, VerificationCode};
use crate::errors::DomainError;

use super::r#trait::VerificationCodeRepository;

/// Verification code repository backed by a `HashMap`
#[derive(Clone, Default)]
pub struct InMemoryVerificationCodeRepository {
    codes: Arc<RwLock<HashMap<Uuid, VerificationCode>>>,
}

impl InMemoryVerificationCodeRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }

    /// Whether the repository holds no records
    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }
}

#[async_trait]
impl VerificationCodeRepository for InMemoryVerificationCodeRepository {
    async fn insert(&self, code: NewVerificationCode) -> Result<VerificationCode, DomainError> {
        let record = code.into_record(Uuid::new_v4(), Utc::now());
        self.codes.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_for_verifiable(&self, verifiable: &str) -> Result<u64, DomainError> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, code| code.verifiable != verifiable);
        Ok((before - codes.len()) as u64)
    }

    async fn find_valid(
        &self,
        verifiable: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let codes = self.codes.read().await;
        Ok(codes
            .values()
            .filter(|c| c.matches(verifiable, code, now))
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.codes.write().await.remove(&id).is_some())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, DomainError> {
        Ok(self.codes.read().await.get(&id).cloned())
    }

    async fn find_by_verifiable(
        &self,
        verifiable: &str,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        let codes = self.codes.read().await;
        let mut found: Vec<VerificationCode> = codes
            .values()
            .filter(|c| c.verifiable == verifiable)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.created_at);
        Ok(found)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, code| !code.is_expired_at(now));
        Ok((before - codes.len()) as u64)
    }
}
