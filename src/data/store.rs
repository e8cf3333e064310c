//! On-disk bookkeeping kept inside the repository's git directory.
//!
//! Layout of `<git-dir>/gerrit-squash/`:
//!
//! - `current-branch`: JSON [`HandOff`] written by `submit` for the hook
//! - `changeid-<key>`: the branch's change identifier
//! - `message-<key>`: the branch's last submitted commit message
//!
//! `<key>` is the branch name with every `/` replaced, see [`branch_key`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::ChangeId;

/// Directory name under the git directory.
pub const STORE_DIR: &str = "gerrit-squash";

const HANDOFF_FILE: &str = "current-branch";
const CHANGE_ID_PREFIX: &str = "changeid-";
const MESSAGE_PREFIX: &str = "message-";

/// The submission in flight, passed from `submit` to the hook it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOff {
    /// Working branch being squashed.
    pub branch: String,
    /// Branch the change is submitted against.
    pub target: String,
}

/// Maps a branch name to the key used in bookkeeping file names.
pub fn branch_key(branch: &str) -> String {
    branch.replace('/', "_")
}

/// Per-repository bookkeeping store.
#[derive(Debug, Clone)]
pub struct Bookkeeping {
    dir: PathBuf,
}

impl Bookkeeping {
    /// Store for the repository whose git directory is `git_dir`.
    pub fn for_git_dir<P: AsRef<Path>>(git_dir: P) -> Self {
        Self {
            dir: git_dir.as_ref().join(STORE_DIR),
        }
    }

    /// Directory holding the bookkeeping files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the change identifier record for `branch`.
    pub fn change_id_path(&self, branch: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", CHANGE_ID_PREFIX, branch_key(branch)))
    }

    /// Path of the cached commit message for `branch`.
    pub fn message_path(&self, branch: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", MESSAGE_PREFIX, branch_key(branch)))
    }

    /// Path of the hand-off record.
    pub fn handoff_path(&self) -> PathBuf {
        self.dir.join(HANDOFF_FILE)
    }

    /// Records the submission in flight.
    pub fn write_handoff(&self, handoff: &HandOff) -> Result<()> {
        let content =
            serde_json::to_string_pretty(handoff).context("Failed to serialize hand-off record")?;
        self.write(&self.handoff_path(), &content)
    }

    /// Reads the submission in flight, if one was recorded.
    pub fn read_handoff(&self) -> Result<Option<HandOff>> {
        let Some(content) = self.read(&self.handoff_path())? else {
            return Ok(None);
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let handoff = serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse hand-off record: {}",
                self.handoff_path().display()
            )
        })?;
        Ok(Some(handoff))
    }

    /// Loads the change identifier for `branch`. Blank or malformed records
    /// count as absent.
    pub fn change_id(&self, branch: &str) -> Result<Option<ChangeId>> {
        let path = self.change_id_path(branch);
        let Some(content) = self.read(&path)? else {
            return Ok(None);
        };

        let change_id = ChangeId::parse(&content);
        if change_id.is_none() && !content.trim().is_empty() {
            debug!("Ignoring malformed change id in {}", path.display());
        }
        Ok(change_id)
    }

    /// Persists the change identifier for `branch`.
    pub fn save_change_id(&self, branch: &str, change_id: &ChangeId) -> Result<()> {
        self.write(&self.change_id_path(branch), change_id.as_str())
    }

    /// Drops the change identifier for `branch`.
    pub fn discard_change_id(&self, branch: &str) -> Result<bool> {
        self.remove(&self.change_id_path(branch))
    }

    /// Loads the last submitted commit message for `branch`.
    pub fn cached_message(&self, branch: &str) -> Result<Option<String>> {
        Ok(self
            .read(&self.message_path(branch))?
            .filter(|message| !message.trim().is_empty()))
    }

    /// Caches the commit message submitted for `branch`.
    pub fn save_message(&self, branch: &str, message: &str) -> Result<()> {
        self.write(&self.message_path(branch), message)
    }

    /// Removes every record kept for `branch`, returning the removed paths.
    pub fn clear_branch(&self, branch: &str) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        for path in [self.change_id_path(branch), self.message_path(branch)] {
            if self.remove(&path)? {
                removed.push(path);
            }
        }
        Ok(removed)
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!(
                "Failed to create bookkeeping directory: {}",
                self.dir.display()
            )
        })?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
