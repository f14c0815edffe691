mod common;
use std::{sync::Arc, thread};
use credvault::model::{credential::token_digest, policy::PolicyConfig, validator::RuleCode};
use credvault::utils::errors::ErrorCode;
use crate::common::{start_flaky_vault, start_vault};


#[test]
fn test_a_token_can_only_be_consumed_once() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    let token = vault.resets.issue("alice").unwrap();
    assert_eq!(vault.resets.consume(&token).unwrap(), "alice");

    let err = vault.resets.consume(&token).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidToken);
    assert!(vault.record("alice").unwrap().reset_token.is_none());
}


#[test]
fn test_issuing_again_invalidates_the_previous_token() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    let first = vault.resets.issue("alice").unwrap();
    let second = vault.resets.issue("alice").unwrap();
    assert_ne!(first, second);

    assert_eq!(vault.resets.consume(&first).unwrap_err().error_code(), ErrorCode::InvalidToken);
    assert_eq!(vault.resets.consume(&second).unwrap(), "alice");
}


#[test]
fn test_unknown_tokens_are_rejected() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();
    let _token = vault.resets.issue("alice").unwrap();

    for bad in &["", "not-a-token", "alice"] {
        let err = vault.resets.consume(bad).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidToken);
        assert_eq!(err.message(), "Invalid reset token.");
    }
}


#[test]
fn test_tokens_are_not_derived_from_the_identity() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    let token = vault.resets.issue("alice").unwrap();
    assert!(!token.contains("alice"));
    assert!(token.len() >= 22); // At least 128 bits in base64.

    // Only the digest is stored.
    let stored = vault.record("alice").unwrap().reset_token.unwrap();
    assert_eq!(stored.token_digest, token_digest(&token));
    assert_ne!(stored.token_digest, token);
    assert_eq!(stored.identity, "alice");
}


#[test]
fn test_issue_for_unknown_identity_fails() {
    let vault = start_vault(PolicyConfig::default());
    let err = vault.resets.issue("nobody").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::UnknownIdentity);
    assert!(vault.record("nobody").is_none());
}


#[test]
fn test_consume_then_set_password() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    let token = vault.resets.issue("alice").unwrap();
    let identity = vault.resets.consume(&token).unwrap();
    vault.credentials.set_password(&identity, "Zebra-Two-2!").unwrap();

    assert!(vault.credentials.verify_password("alice", "Zebra-Two-2!").unwrap());
    assert!(!vault.credentials.verify_password("alice", "Zebra-One-1!").unwrap());
}


#[test]
fn test_complete_reset_sets_password_and_burns_token() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    let token = vault.resets.issue("alice").unwrap();
    assert_eq!(vault.resets.complete_reset(&token, "Zebra-Two-2!").unwrap(), "alice");

    assert!(vault.credentials.verify_password("alice", "Zebra-Two-2!").unwrap());
    assert!(vault.record("alice").unwrap().reset_token.is_none());

    let err = vault.resets.complete_reset(&token, "Zebra-Three-3!").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidToken);
}


#[test]
fn test_rejected_reset_password_keeps_the_token_pending() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();
    let token = vault.resets.issue("alice").unwrap();

    let err = vault.resets.complete_reset(&token, "weak").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PolicyViolation);
    assert_eq!(err.violations()[0].code, RuleCode::TooShort);

    let err = vault.resets.complete_reset(&token, "Zebra-One-1!").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PasswordReused);

    assert!(vault.record("alice").unwrap().reset_token.is_some());
    assert_eq!(vault.resets.complete_reset(&token, "Zebra-Two-2!").unwrap(), "alice");
}


#[test]
fn test_tokens_never_expire_without_a_ttl() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    vault.set_time("2021-08-23T09:30:00Z");
    let token = vault.resets.issue("alice").unwrap();

    vault.set_time("2022-08-23T09:30:00Z");
    assert_eq!(vault.resets.consume(&token).unwrap(), "alice");
}


#[test]
fn test_tokens_expire_after_the_ttl() {
    let vault = start_vault(PolicyConfig { reset_token_ttl: Some(15 * 60), ..Default::default() });
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    vault.set_time("2021-08-23T09:30:00Z");
    let token = vault.resets.issue("alice").unwrap();

    // Re-issuing restarts the window.
    vault.set_time("2021-08-23T09:44:59Z");
    let second = vault.resets.issue("alice").unwrap();
    assert_ne!(token, second);

    // Outside the window it's rejected with the same error as an unknown token, and cleared.
    vault.set_time("2021-08-23T10:00:00Z");
    let err = vault.resets.consume(&second).unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::InvalidToken);
    assert_eq!(err.message(), "Invalid reset token.");
    assert!(vault.record("alice").unwrap().reset_token.is_none());
}


#[test]
fn test_token_inside_ttl_is_accepted() {
    let vault = start_vault(PolicyConfig { reset_token_ttl: Some(15 * 60), ..Default::default() });
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();

    vault.set_time("2021-08-23T09:30:00Z");
    let token = vault.resets.issue("alice").unwrap();

    vault.advance_secs(15 * 60 - 1);
    assert_eq!(vault.resets.consume(&token).unwrap(), "alice");
}


#[test]
fn test_concurrent_consumes_only_one_succeeds() {
    let vault = start_vault(PolicyConfig::default());
    vault.credentials.set_password("alice", "Zebra-One-1!").unwrap();
    let token = Arc::new(vault.resets.issue("alice").unwrap());

    let resets = Arc::new(vault.resets.clone());
    let handles: Vec<_> = (0..8).map(|_| {
        let (resets, token) = (resets.clone(), token.clone());
        thread::spawn(move || resets.consume(&token))
    }).collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();

    assert_eq!(successes, 1);
}


#[test]
fn test_persistence_failure_is_surfaced_and_nothing_changes() {
    let (store, credentials, resets) = start_flaky_vault(PolicyConfig::default());
    credentials.set_password("alice", "Zebra-One-1!").unwrap();
    let token = resets.issue("alice").unwrap();

    *store.fail_saves.lock() = true;

    let err = credentials.set_password("alice", "Zebra-Two-2!").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PersistenceError);
    assert!(err.is_retryable());

    let err = resets.complete_reset(&token, "Zebra-Two-2!").unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::PersistenceError);

    *store.fail_saves.lock() = false;

    // The old password still works and the token is still pending.
    assert!(credentials.verify_password("alice", "Zebra-One-1!").unwrap());
    assert!(!credentials.verify_password("alice", "Zebra-Two-2!").unwrap());
    assert_eq!(resets.complete_reset(&token, "Zebra-Two-2!").unwrap(), "alice");
}
