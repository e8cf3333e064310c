//! Gerrit change identifiers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in an identifier (40 hex digits).
const CHANGE_ID_BYTES: usize = 20;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CHANGE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^I[0-9a-f]{40}$").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CHANGE_ID_TRAILER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Change-Id:\s*(I[0-9a-f]{40})\s*$").unwrap());

/// Inputs hashed into a new change identifier.
#[derive(Debug, Clone)]
pub struct ChangeIdSeed<'a> {
    /// Working branch being submitted.
    pub branch: &'a str,
    /// Tree object id of the squashed index.
    pub tree: &'a str,
    /// `git var GIT_AUTHOR_IDENT`.
    pub author: &'a str,
    /// `git var GIT_COMMITTER_IDENT`.
    pub committer: &'a str,
}

/// A `Change-Id` value: `I` followed by 40 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeId(String);

impl ChangeId {
    /// Hashes the seed into a fresh identifier.
    pub fn generate(seed: &ChangeIdSeed<'_>) -> Self {
        let mut hasher = Sha256::new();
        for (label, value) in [
            ("branch", seed.branch),
            ("tree", seed.tree),
            ("author", seed.author),
            ("committer", seed.committer),
        ] {
            hasher.update(label.as_bytes());
            hasher.update(b" ");
            hasher.update(value.as_bytes());
            hasher.update(b"\n");
        }
        let digest = hasher.finalize();

        Self(format!("I{}", hex::encode(&digest[..CHANGE_ID_BYTES])))
    }

    /// Parses a stored identifier, rejecting anything malformed.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        CHANGE_ID_PATTERN
            .is_match(value)
            .then(|| Self(value.to_string()))
    }

    /// Returns the last `Change-Id:` trailer found in a commit message.
    pub fn find_in_message(message: &str) -> Option<Self> {
        CHANGE_ID_TRAILER
            .captures_iter(message)
            .last()
            .map(|caps| Self(caps[1].to_string()))
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailer line carrying this identifier.
    pub fn trailer(&self) -> String {
        format!("Change-Id: {}", self.0)
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed<'a>(branch: &'a str, author: &'a str) -> ChangeIdSeed<'a> {
        ChangeIdSeed {
            branch,
            tree: "4b825dc642cb6eb9a060e54bf8d69288fbee4904",
            author,
            committer: "Test User <test@example.com> 1700000000 +0000",
        }
    }

    #[test]
    fn generated_ids_are_well_formed() {
        let id = ChangeId::generate(&seed(
            "feature/login",
            "Test User <test@example.com> 1700000000 +0000",
        ));

        assert_eq!(id.as_str().len(), 41);
        assert_eq!(ChangeId::parse(id.as_str()), Some(id.clone()));
        assert_eq!(id.trailer(), format!("Change-Id: {id}"));
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let author = "Test User <test@example.com> 1700000000 +0000";
        assert_eq!(
            ChangeId::generate(&seed("feature/login", author)),
            ChangeId::generate(&seed("feature/login", author))
        );
    }

    #[test]
    fn any_seed_field_changes_the_id() {
        let author = "Test User <test@example.com> 1700000000 +0000";
        let base = ChangeId::generate(&seed("feature/login", author));

        assert_ne!(base, ChangeId::generate(&seed("feature/logout", author)));
        assert_ne!(
            base,
            ChangeId::generate(&seed(
                "feature/login",
                "Test User <test@example.com> 1700000001 +0000"
            ))
        );
    }

    #[test]
    fn parse_rejects_malformed_values() {
        assert!(ChangeId::parse("").is_none());
        assert!(ChangeId::parse("I123").is_none());
        assert!(ChangeId::parse("Iabcdefabcdefabcdefabcdefabcdefabcdefabcdeg").is_none());
        assert!(ChangeId::parse("J0123456789abcdef0123456789abcdef01234567").is_none());
        assert!(ChangeId::parse("I0123456789abcdef0123456789abcdef01234567\n").is_some());
    }

    #[test]
    fn find_in_message_takes_last_trailer() {
        let message = "Add login\n\n\
                       Change-Id: I0000000000000000000000000000000000000000\n\
                       Change-Id: I1111111111111111111111111111111111111111\n";

        assert_eq!(
            ChangeId::find_in_message(message).unwrap().as_str(),
            "I1111111111111111111111111111111111111111"
        );
        assert!(ChangeId::find_in_message("Add login\n").is_none());
    }
}
