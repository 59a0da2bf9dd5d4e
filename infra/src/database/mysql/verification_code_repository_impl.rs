//! MySQL implementation of the VerificationCodeRepository trait.
//!
//! Codes live in the `verification_codes` table. Ids are stored as
//! hyphenated UUID strings. `verifiable` and `code` use a binary collation so
//! lookups match case and accents exactly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use vc_core::domain::entities::verification_code::{NewVerificationCode, VerificationCode};
use vc_core::errors::DomainError;
use vc_core::repositories::VerificationCodeRepository;
use vc_shared::utils::mask_verifiable;

use crate::InfrastructureError;

/// Schema of the verification code table
pub const CREATE_VERIFICATION_CODES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS verification_codes (
        id CHAR(36) NOT NULL PRIMARY KEY,
        verifiable VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        code VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        expires_at DATETIME(6) NOT NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        INDEX idx_verification_codes_verifiable (verifiable)
    )
"#;

/// MySQL implementation of VerificationCodeRepository
pub struct MySqlVerificationCodeRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationCodeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Create the `verification_codes` table if it does not exist
    pub async fn ensure_table(&self) -> Result<(), InfrastructureError> {
        sqlx::query(CREATE_VERIFICATION_CODES_TABLE)
            .execute(&self.pool)
            .await?;
        debug!("Ensured verification_codes table exists");
        Ok(())
    }

    fn internal(context: &str, e: impl std::fmt::Display) -> DomainError {
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }

    /// Convert a database row to a VerificationCode entity
    fn row_to_code(row: &sqlx::mysql::MySqlRow) -> Result<VerificationCode, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| Self::internal("Failed to get id", e))?;

        Ok(VerificationCode {
            id: Uuid::parse_str(&id)
                .map_err(|e| Self::internal("Invalid verification code UUID", e))?,
            verifiable: row
                .try_get("verifiable")
                .map_err(|e| Self::internal("Failed to get verifiable", e))?,
            code: row
                .try_get("code")
                .map_err(|e| Self::internal("Failed to get code", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| Self::internal("Failed to get expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| Self::internal("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| Self::internal("Failed to get updated_at", e))?,
        })
    }
}

#[async_trait]
impl VerificationCodeRepository for MySqlVerificationCodeRepository {
    async fn insert(&self, code: NewVerificationCode) -> Result<VerificationCode, DomainError> {
        let record = code.into_record(Uuid::new_v4(), Utc::now());

        let query = r#"
            INSERT INTO verification_codes (
                id, verifiable, code, expires_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.verifiable)
            .bind(&record.code)
            .bind(record.expires_at)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    verifiable = %mask_verifiable(&record.verifiable),
                    error = %e,
                    "Failed to store verification code"
                );
                Self::internal("Failed to store verification code", e)
            })?;

        Ok(record)
    }

    async fn delete_for_verifiable(&self, verifiable: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE verifiable = ?")
            .bind(verifiable)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to delete verification codes", e))?;

        Ok(result.rows_affected())
    }

    async fn find_valid(
        &self,
        verifiable: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let query = r#"
            SELECT id, verifiable, code, expires_at, created_at, updated_at
            FROM verification_codes
            WHERE verifiable = ? AND code = ? AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(verifiable)
            .bind(code)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to find verification code", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_code(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to delete verification code", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, DomainError> {
        let query = r#"
            SELECT id, verifiable, code, expires_at, created_at, updated_at
            FROM verification_codes
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to find verification code by id", e))?;

        result.as_ref().map(Self::row_to_code).transpose()
    }

    async fn find_by_verifiable(
        &self,
        verifiable: &str,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        let query = r#"
            SELECT id, verifiable, code, expires_at, created_at, updated_at
            FROM verification_codes
            WHERE verifiable = ?
            ORDER BY created_at ASC
        "#;

        let rows = sqlx::query(query)
            .bind(verifiable)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to find verification codes", e))?;

        rows.iter().map(Self::row_to_code).collect()
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to delete expired verification codes", e))?;

        Ok(result.rows_affected())
    }
}
