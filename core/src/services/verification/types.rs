//! Types for verification service results

use crate::domain::entities::verification_code::VerificationCode;

/// Result of sending a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendCodeResult {
    /// A code was stored and its notification dispatched
    Issued { verification_code: VerificationCode },
    /// The verifiable is a test verifiable; nothing was stored or dispatched
    TestBypass,
}

impl SendCodeResult {
    /// The stored code, if one was issued
    pub fn verification_code(&self) -> Option<&VerificationCode> {
        match self {
            SendCodeResult::Issued { verification_code } => Some(verification_code),
            SendCodeResult::TestBypass => None,
        }
    }

    pub fn is_test_bypass(&self) -> bool {
        matches!(self, SendCodeResult::TestBypass)
    }
}
