//! Verification code configuration module

use serde::{Deserialize, Serialize};

/// Name under which the built-in notification is registered
pub const DEFAULT_NOTIFICATION: &str = "verification_code_created";

/// Character set used when generating codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodeCharset {
    /// Digits only
    #[default]
    Numeric,
    /// ASCII letters only
    Alpha,
    /// ASCII letters and digits
    Alphanumeric,
}

impl CodeCharset {
    /// Characters that generated codes are drawn from
    pub fn characters(&self) -> &'static [u8] {
        match self {
            CodeCharset::Numeric => b"0123456789",
            CodeCharset::Alpha => b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
            CodeCharset::Alphanumeric => {
                b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
            }
        }
    }
}

impl std::str::FromStr for CodeCharset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "numeric" | "digits" => Ok(CodeCharset::Numeric),
            "alpha" | "letters" => Ok(CodeCharset::Alpha),
            "alphanumeric" => Ok(CodeCharset::Alphanumeric),
            _ => Err(format!("Invalid code charset: {}", s)),
        }
    }
}

/// Settings for issuing and verifying codes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of characters in a generated code
    #[serde(default = "default_length")]
    pub length: usize,

    /// Character set generated codes are drawn from
    #[serde(default)]
    pub charset: CodeCharset,

    /// Lifetime of an issued code in seconds
    #[serde(default = "default_expire_seconds")]
    pub expire_seconds: i64,

    /// Queue used for deferred delivery; `None` or empty means inline delivery
    #[serde(default)]
    pub queue: Option<String>,

    /// Verifiables that never receive a real code
    ///
    /// Accepts a list or a comma separated string.
    #[serde(default, deserialize_with = "deserialize_list")]
    pub test_verifiables: Vec<String>,

    /// Code accepted for test verifiables
    #[serde(default)]
    pub test_code: String,

    /// Registered name of the notification to dispatch
    #[serde(default = "default_notification")]
    pub notification: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            charset: CodeCharset::default(),
            expire_seconds: default_expire_seconds(),
            queue: None,
            test_verifiables: Vec::new(),
            test_code: String::new(),
            notification: default_notification(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let length = std::env::var("VERIFICATION_CODE_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.length);
        let charset = std::env::var("VERIFICATION_CODE_CHARSET")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.charset);
        let expire_seconds = std::env::var("VERIFICATION_CODE_EXPIRE_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.expire_seconds);
        let queue = std::env::var("VERIFICATION_CODE_QUEUE")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let test_verifiables = std::env::var("VERIFICATION_CODE_TEST_VERIFIABLES")
            .map(|v| parse_list(&v))
            .unwrap_or_default();
        let test_code = std::env::var("VERIFICATION_CODE_TEST_CODE").unwrap_or_default();
        let notification = std::env::var("VERIFICATION_CODE_NOTIFICATION")
            .unwrap_or(defaults.notification);

        Self {
            length,
            charset,
            expire_seconds,
            queue,
            test_verifiables,
            test_code,
            notification,
        }
    }

    /// Set the delivery queue
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    /// Set the test verifiables and the code they accept
    pub fn with_test_verifiables<I, S>(
        mut self,
        verifiables: I,
        test_code: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_verifiables = verifiables.into_iter().map(Into::into).collect();
        self.test_code = test_code.into();
        self
    }

    /// Set the notification name
    pub fn with_notification(mut self, notification: impl Into<String>) -> Self {
        self.notification = notification.into();
        self
    }
}

/// Split a comma separated list, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrString {
    List(Vec<String>),
    String(String),
}

fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match ListOrString::deserialize(deserializer)? {
        ListOrString::List(values) => values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
        ListOrString::String(value) => parse_list(&value),
    })
}

fn default_length() -> usize {
    6
}

fn default_expire_seconds() -> i64 {
    3600
}

fn default_notification() -> String {
    DEFAULT_NOTIFICATION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert_eq!(config.length, 6);
        assert_eq!(config.charset, CodeCharset::Numeric);
        assert_eq!(config.expire_seconds, 3600);
        assert!(config.queue.is_none());
        assert!(config.test_verifiables.is_empty());
        assert!(config.test_code.is_empty());
        assert_eq!(config.notification, DEFAULT_NOTIFICATION);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let config: VerificationConfig =
            serde_json::from_str(r#"{"queue": "mail", "test_verifiables": ["a@example.com"]}"#)
                .unwrap();
        assert_eq!(config.queue.as_deref(), Some("mail"));
        assert_eq!(config.test_verifiables, vec!["a@example.com".to_string()]);
        assert_eq!(config.length, 6);
        assert_eq!(config.notification, DEFAULT_NOTIFICATION);
    }

    #[test]
    fn test_deserialize_comma_separated_test_verifiables() {
        let config: VerificationConfig =
            serde_json::from_str(r#"{"test_verifiables": "qa@example.com, ci@example.com"}"#)
                .unwrap();
        assert_eq!(
            config.test_verifiables,
            vec!["qa@example.com".to_string(), "ci@example.com".to_string()]
        );
    }

    #[test]
    fn test_charset_from_str() {
        assert_eq!("numeric".parse::<CodeCharset>().unwrap(), CodeCharset::Numeric);
        assert_eq!("ALPHA".parse::<CodeCharset>().unwrap(), CodeCharset::Alpha);
        assert_eq!(
            "alphanumeric".parse::<CodeCharset>().unwrap(),
            CodeCharset::Alphanumeric
        );
        assert!("emoji".parse::<CodeCharset>().is_err());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list(" a@example.com, ,b@example.com "),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_builders() {
        let config = VerificationConfig::default()
            .with_queue("q1")
            .with_test_verifiables(["test@example.com"], "T")
            .with_notification("custom");
        assert_eq!(config.queue.as_deref(), Some("q1"));
        assert_eq!(config.test_verifiables, vec!["test@example.com".to_string()]);
        assert_eq!(config.test_code, "T");
        assert_eq!(config.notification, "custom");
    }
}
