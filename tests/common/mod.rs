#![allow(dead_code)]

use std::sync::Arc;
use chrono::{DateTime, Utc};
use credvault::{CredentialManager, ResetTokenService};
use credvault::db::{CredentialStore, memory::MemoryStore};
use credvault::model::{credential::CredentialRecord, policy::PolicyConfig, validator::PasswordPolicyValidator};
use credvault::utils::{context::ServiceContext, errors::CredentialError};

///
/// Tests should start by calling start_vault to get a fresh engine backed by an in-memory store.
///
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub ctx: Arc<ServiceContext>,
    pub credentials: CredentialManager,
    pub resets: ResetTokenService,
}

impl TestContext {
    pub fn record(&self, identity: &str) -> Option<CredentialRecord> {
        self.store.load(identity).expect("memory store load cannot fail")
    }

    pub fn set_time(&self, rfc3339: &str) {
        let now: DateTime<Utc> = DateTime::parse_from_rfc3339(rfc3339)
            .expect("bad test timestamp")
            .into();
        self.ctx.set_now(Some(now));
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.ctx.advance_time(chrono::Duration::seconds(seconds));
    }
}

pub fn start_vault(policy: PolicyConfig) -> TestContext {
    credvault::init_tracing();

    let store = Arc::new(MemoryStore::new());
    let ctx = Arc::new(ServiceContext::new(policy, store.clone(), PasswordPolicyValidator::default())
        .expect("test policy should be valid"));

    TestContext {
        store,
        credentials: CredentialManager::new(ctx.clone()),
        resets: ResetTokenService::new(ctx.clone()),
        ctx,
    }
}

///
/// A store whose writes can be made to fail, for checking nothing is half-applied.
///
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_saves: parking_lot::Mutex<bool>,
}

impl CredentialStore for FlakyStore {
    fn load(&self, identity: &str) -> Result<Option<CredentialRecord>, CredentialError> {
        self.inner.load(identity)
    }

    fn save(&self, identity: &str, record: &CredentialRecord) -> Result<(), CredentialError> {
        if *self.fail_saves.lock() {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "connection reset").into())
        }
        self.inner.save(identity, record)
    }

    fn remove(&self, identity: &str) -> Result<bool, CredentialError> {
        self.inner.remove(identity)
    }

    fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<String>, CredentialError> {
        self.inner.find_by_reset_token(token_digest)
    }
}

pub fn start_flaky_vault(policy: PolicyConfig) -> (Arc<FlakyStore>, CredentialManager, ResetTokenService) {
    credvault::init_tracing();

    let store = Arc::new(FlakyStore::default());
    let ctx = Arc::new(ServiceContext::new(policy, store.clone(), PasswordPolicyValidator::default())
        .expect("test policy should be valid"));

    (store, CredentialManager::new(ctx.clone()), ResetTokenService::new(ctx))
}
