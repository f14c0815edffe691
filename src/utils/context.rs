use std::sync::Arc;
use parking_lot::RwLock;
use chrono::{DateTime, Duration, Utc};
use crate::db::CredentialStore;
use crate::model::{hasher::PasswordHasher, policy::PolicyConfig, validator::PasswordPolicyValidator};
use crate::utils::{clock::Clock, errors::CredentialError, locks::IdentityLocks};

///
/// The context shared by the credential manager and reset token service - the policy, the store, the
/// hasher and the per-identity locks.
///
pub struct ServiceContext {
    policy: PolicyConfig,
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    validator: PasswordPolicyValidator,
    locks: IdentityLocks,
    clock: RwLock<Clock>,
}

impl ServiceContext {
    pub fn new(policy: PolicyConfig, store: Arc<dyn CredentialStore>, validator: PasswordPolicyValidator)
        -> Result<Self, CredentialError> {

        policy.validate()?;

        Ok(ServiceContext {
            policy,
            store,
            hasher: PasswordHasher::default(),
            validator,
            locks: IdentityLocks::new(),
            clock: RwLock::new(Clock::default()),
        })
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.read().now()
    }

    ///
    /// Freeze the clock at the given time, or return to the system clock with None.
    ///
    pub fn set_now(&self, now: Option<DateTime<Utc>>) {
        let mut clock = self.clock.write();
        match now {
            Some(now) => clock.freeze(now),
            None => clock.thaw(),
        }
    }

    pub fn advance_time(&self, by: Duration) {
        self.clock.write().advance(by);
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn validator(&self) -> &PasswordPolicyValidator {
        &self.validator
    }

    pub fn locks(&self) -> &IdentityLocks {
        &self.locks
    }
}
