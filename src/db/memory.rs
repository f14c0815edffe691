use std::collections::HashMap;
use parking_lot::RwLock;
use super::CredentialStore;
use crate::{model::credential::CredentialRecord, utils::errors::CredentialError};

///
/// A process-local store. Records are lost when the process exits.
///
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self, identity: &str) -> Result<Option<CredentialRecord>, CredentialError> {
        Ok(self.records.read().get(identity).cloned())
    }

    fn save(&self, identity: &str, record: &CredentialRecord) -> Result<(), CredentialError> {
        self.records.write().insert(identity.to_string(), record.clone());
        Ok(())
    }

    fn remove(&self, identity: &str) -> Result<bool, CredentialError> {
        Ok(self.records.write().remove(identity).is_some())
    }

    fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<String>, CredentialError> {
        Ok(find_by_reset_token(&self.records.read(), token_digest))
    }
}

pub(crate) fn find_by_reset_token(records: &HashMap<String, CredentialRecord>, token_digest: &str) -> Option<String> {
    records
        .iter()
        .find(|(_identity, record)| matches!(&record.reset_token, Some(token) if token.token_digest == token_digest))
        .map(|(identity, _record)| identity.clone())
}
