use std::{collections::HashMap, io::Write, path::{Path, PathBuf}};
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use super::{CredentialStore, memory};
use crate::{model::credential::CredentialRecord, utils::errors::{ErrorCode, CredentialError}};

///
/// Keeps every record in one JSON document on disk.
///
/// Writes go to a temporary file beside the document which is then renamed over it, so the document on
/// disk is always either the previous or the new version. The in-memory copy is only updated once the
/// rename has succeeded.
///
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl JsonFileStore {
    ///
    /// Open the store at the path given, starting empty if the file doesn't exist yet.
    ///
    pub fn open(path: &Path) -> Result<Self, CredentialError> {
        let records = match path.exists() {
            true => {
                let contents = std::fs::read_to_string(path)?;
                match contents.trim().is_empty() {
                    true  => HashMap::new(),
                    false => serde_json::from_str(&contents)
                        .map_err(|e| ErrorCode::MalformedCredentialRecord
                            .with_msg(&format!("The credential store {} is corrupt: {}", path.display(), e)))?,
                }
            },
            false => HashMap::new(),
        };

        tracing::info!("Opened credential store {} with {} records", path.display(), records.len());

        Ok(JsonFileStore { path: path.to_path_buf(), records: RwLock::new(records) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, records: &HashMap<String, CredentialRecord>) -> Result<(), CredentialError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, records)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;
        Ok(())
    }

    ///
    /// Apply a change to a copy of the records, write it out, then publish it.
    ///
    fn commit<F, R>(&self, change: F) -> Result<R, CredentialError>
        where F: FnOnce(&mut HashMap<String, CredentialRecord>) -> R {

        let mut lock = self.records.write();
        let mut updated = lock.clone();
        let result = change(&mut updated);

        self.write_document(&updated)?;
        *lock = updated;
        Ok(result)
    }
}

impl CredentialStore for JsonFileStore {
    fn load(&self, identity: &str) -> Result<Option<CredentialRecord>, CredentialError> {
        Ok(self.records.read().get(identity).cloned())
    }

    fn save(&self, identity: &str, record: &CredentialRecord) -> Result<(), CredentialError> {
        self.commit(|records| { records.insert(identity.to_string(), record.clone()); })
    }

    fn remove(&self, identity: &str) -> Result<bool, CredentialError> {
        if !self.records.read().contains_key(identity) {
            return Ok(false)
        }
        self.commit(|records| records.remove(identity).is_some())
    }

    fn find_by_reset_token(&self, token_digest: &str) -> Result<Option<String>, CredentialError> {
        Ok(memory::find_by_reset_token(&self.records.read(), token_digest))
    }
}
