use std::{collections::HashSet, path::Path};
use crate::utils::errors::{ErrorCode, CredentialError};

pub const SEED_WORDS: [&str; 3] = ["123456", "password", "qwerty"];

///
/// A source of passwords that are too common to be allowed.
///
pub trait Denylist: Send + Sync {
    fn is_denylisted(&self, candidate: &str) -> bool;
}

///
/// An in-memory denylist. Matching is a case-insensitive comparison of the whole candidate.
///
#[derive(Clone, Debug)]
pub struct StaticDenylist {
    words: HashSet<String>,
}

impl Default for StaticDenylist {
    fn default() -> Self {
        StaticDenylist::new(SEED_WORDS.iter().copied())
    }
}

impl StaticDenylist {
    pub fn new<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        StaticDenylist {
            words: words.into_iter().map(str::to_lowercase).collect()
        }
    }

    ///
    /// Load the seed words plus one word per line from a file. Blank lines and # comments are skipped.
    ///
    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ErrorCode::InvalidConfig.with_msg(&format!("Unable to read denylist {}: {}", path.display(), e)))?;

        let mut denylist = StaticDenylist::default();
        denylist.words.extend(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase));

        tracing::info!("Loaded {} denylisted passwords from {}", denylist.len(), path.display());
        Ok(denylist)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Denylist for StaticDenylist {
    fn is_denylisted(&self, candidate: &str) -> bool {
        self.words.contains(&candidate.to_lowercase())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_seed_words_match_any_case() {
        let denylist = StaticDenylist::default();
        assert!(denylist.is_denylisted("password"));
        assert!(denylist.is_denylisted("PassWord"));
        assert!(denylist.is_denylisted("QWERTY"));
        assert!(denylist.is_denylisted("123456"));
    }

    #[test]
    fn test_only_whole_candidate_matches() {
        let denylist = StaticDenylist::default();
        assert!(!denylist.is_denylisted("Password1!"));
        assert!(!denylist.is_denylisted("my-qwerty"));
    }

    #[test]
    fn test_file_words_extend_the_seed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# common passwords\nLetMeIn\n\n  dragon  ").unwrap();

        let denylist = StaticDenylist::from_file(file.path()).unwrap();
        assert_eq!(denylist.len(), 5);
        assert!(denylist.is_denylisted("letmein"));
        assert!(denylist.is_denylisted("Dragon"));
        assert!(denylist.is_denylisted("qwerty"));
        assert!(!denylist.is_denylisted("# common passwords"));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = StaticDenylist::from_file(Path::new("/no/such/denylist.txt")).unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::InvalidConfig);
    }
}
