use std::{collections::HashMap, sync::Arc};
use parking_lot::Mutex;

///
/// One mutex per identity, created on demand and dropped once nobody holds or waits on it.
///
/// Operations on different identities never block each other.
///
#[derive(Debug, Default)]
pub struct IdentityLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        IdentityLocks::default()
    }

    ///
    /// Run the closure while holding the identity's lock.
    ///
    pub fn with_lock<F, R>(&self, identity: &str, f: F) -> R
        where F: FnOnce() -> R {

        let registration = Registration {
            owner: self,
            identity,
            lock: self.locks
                .lock()
                .entry(identity.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        };

        // Released before the registration drops, even if f panics.
        let _guard = registration.lock.lock();
        f()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}


///
/// A caller's hold on an identity's registry entry. Dropping it removes the entry if nobody else is using it.
///
struct Registration<'a> {
    owner: &'a IdentityLocks,
    identity: &'a str,
    lock: Arc<Mutex<()>>,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        // The registry's copy plus ours means no-one else is waiting.
        let mut locks = self.owner.locks.lock();
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(self.identity);
        }
    }
}
