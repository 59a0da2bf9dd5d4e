//! Configuration loading from the environment
//!
//! Kept in its own test binary because it mutates process environment.

use vc_core::VerificationServiceConfig;
use vc_shared::config::CodeCharset;

#[test]
fn test_load_config_layers_environment() {
    std::env::set_var("VERIFICATION_CODE_QUEUE", "mail");
    std::env::set_var("VERIFICATION_CODE_TEST_VERIFIABLES", "qa@example.com,ci@example.com");
    std::env::set_var("VERIFICATION_CODE_TEST_CODE", "000000");
    std::env::set_var("APP__VERIFICATION__LENGTH", "8");
    std::env::set_var("APP__VERIFICATION__CHARSET", "alphanumeric");
    std::env::set_var("APP__VERIFICATION__TEST_VERIFIABLES", "qa@example.com,ops@example.com");
    std::env::set_var("APP__VERIFICATION__TEST_CODE", "000111");

    let config = vc_infra::load_config().unwrap();

    assert_eq!(config.verification.queue.as_deref(), Some("mail"));
    assert_eq!(config.verification.length, 8);
    assert_eq!(config.verification.charset, CodeCharset::Alphanumeric);
    assert_eq!(config.verification.test_code, "000111");
    assert_eq!(
        config.verification.test_verifiables,
        vec!["qa@example.com".to_string(), "ops@example.com".to_string()]
    );

    let service_config = VerificationServiceConfig::try_from(&config.verification).unwrap();
    assert_eq!(service_config.code_length, 8);
    assert!(service_config.is_test_verifiable("ops@example.com"));
    assert!(!service_config.is_test_verifiable("ci@example.com"));
}
