//! Repository trait for verification code persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_code::{NewVerificationCode, VerificationCode};
use crate::errors::DomainError;

/// Storage contract for verification codes
///
/// Implementations must make `delete_by_id` report whether a row was actually
/// removed; the verifier relies on that flag to guarantee single use when two
/// verifications race for the same record.
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Insert a new code, assigning its id and timestamps
    ///
    /// # Returns
    /// * `Ok(VerificationCode)` - The stored record
    /// * `Err(DomainError)` - Storage failure
    async fn insert(&self, code: NewVerificationCode) -> Result<VerificationCode, DomainError>;

    /// Delete every code stored for a verifiable, expired or not
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of deleted records
    async fn delete_for_verifiable(&self, verifiable: &str) -> Result<u64, DomainError>;

    /// Find a code matching both verifiable and code that has not expired at `now`
    async fn find_valid(
        &self,
        verifiable: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError>;

    /// Delete a code by id
    ///
    /// # Returns
    /// * `Ok(true)` - This call removed the record
    /// * `Ok(false)` - No record with that id existed anymore
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Find a code by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, DomainError>;

    /// All codes stored for a verifiable, oldest first
    async fn find_by_verifiable(
        &self,
        verifiable: &str,
    ) -> Result<Vec<VerificationCode>, DomainError>;

    /// Delete every code that expired at or before `now`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of deleted records
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
