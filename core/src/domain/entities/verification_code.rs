//! Verification code entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Identifier assigned by storage
    pub id: Uuid,

    /// Identity the code was issued to (e.g. an email address)
    pub verifiable: String,

    /// The secret token
    pub code: String,

    /// Timestamp after which the code no longer verifies
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last write to the record
    pub updated_at: DateTime<Utc>,
}

/// A code about to be inserted; storage assigns the id and timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerificationCode {
    pub verifiable: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl NewVerificationCode {
    /// Creates a code for `verifiable` that expires `lifetime` from now
    pub fn new(verifiable: impl Into<String>, code: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            verifiable: verifiable.into(),
            code: code.into(),
            expires_at: Utc::now() + lifetime,
        }
    }

    /// Turns the pending code into a stored record
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> VerificationCode {
        VerificationCode {
            id,
            verifiable: self.verifiable,
            code: self.code,
            expires_at: self.expires_at,
            created_at: now,
            updated_at: now,
        }
    }
}

impl VerificationCode {
    /// Checks if the code has expired as of `now`
    ///
    /// A code expiring exactly at `now` is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Checks if the code has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks whether this record matches a submitted code for a verifiable
    /// and is still live at `now`
    pub fn matches(&self, verifiable: &str, code: &str, now: DateTime<Utc>) -> bool {
        self.verifiable == verifiable && self.code == code && !self.is_expired_at(now)
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in: Duration) -> VerificationCode {
        NewVerificationCode::new("jane@example.com", "123456", expires_in)
            .into_record(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_new_code_sets_expiry() {
        let before = Utc::now();
        let pending = NewVerificationCode::new("jane@example.com", "123456", Duration::minutes(10));

        assert_eq!(pending.verifiable, "jane@example.com");
        assert_eq!(pending.code, "123456");
        assert!(pending.expires_at >= before + Duration::minutes(10));
        assert!(pending.expires_at <= Utc::now() + Duration::minutes(10));
    }

    #[test]
    fn test_into_record() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let code = NewVerificationCode::new("jane@example.com", "abc", Duration::minutes(1))
            .into_record(id, now);

        assert_eq!(code.id, id);
        assert_eq!(code.created_at, now);
        assert_eq!(code.updated_at, now);
        assert_eq!(code.code, "abc");
    }

    #[test]
    fn test_is_expired() {
        assert!(!record(Duration::minutes(5)).is_expired());
        assert!(record(Duration::minutes(-5)).is_expired());
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let code = record(Duration::minutes(5));
        assert!(code.is_expired_at(code.expires_at));
        assert!(!code.is_expired_at(code.expires_at - Duration::milliseconds(1)));
    }

    #[test]
    fn test_matches() {
        let code = record(Duration::minutes(5));
        let now = Utc::now();

        assert!(code.matches("jane@example.com", "123456", now));
        assert!(!code.matches("jane@example.com", "654321", now));
        assert!(!code.matches("john@example.com", "123456", now));
        assert!(!code.matches("jane@example.com", "123456", code.expires_at));
    }

    #[test]
    fn test_time_until_expiration() {
        let live = record(Duration::minutes(5));
        assert!(live.time_until_expiration() <= Duration::minutes(5));
        assert!(live.time_until_expiration() > Duration::minutes(4));

        let expired = record(Duration::minutes(-1));
        assert_eq!(expired.time_until_expiration(), Duration::zero());
    }

    #[test]
    fn test_serialization() {
        let code = record(Duration::minutes(5));
        let json = serde_json::to_string(&code).unwrap();
        let deserialized: VerificationCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, deserialized);
    }
}
