use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use super::hasher::{HashedPassword, PasswordHasher};

///
/// The recent password hashes for one identity, oldest first. The newest entry is the current password.
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PasswordHistoryStore {
    entries: VecDeque<HashedPassword>,
}

impl PasswordHistoryStore {
    ///
    /// True if the candidate matches any remembered password.
    ///
    /// Every entry is checked, even after a match, so the time taken doesn't reveal which one matched.
    ///
    pub fn contains(&self, candidate: &str, hasher: &PasswordHasher) -> bool {
        self.entries
            .iter()
            .fold(false, |found, entry| hasher.verify(candidate, entry) | found)
    }

    ///
    /// Remember a new hash, evicting the oldest entries beyond the depth. A depth of zero keeps nothing.
    ///
    pub fn append(&mut self, hashed: HashedPassword, depth: usize) {
        self.entries.push_back(hashed);
        while self.entries.len() > depth {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashedPassword> {
        self.entries.iter()
    }
}
