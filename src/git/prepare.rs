//! Commit message preparation run from the `prepare-commit-msg` hook.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::data::{compose_proposed_message, Bookkeeping, ChangeId, ChangeIdSeed};
use crate::error::SquashError;
use crate::git::{GitCli, GitRepository, SCRATCH_BRANCH};

/// What the hook did to the message file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// Not a squash commit; the message file was left alone.
    PassThrough,
    /// A new change identifier was minted and appended.
    Minted(ChangeId),
    /// The change is still under review; its identifier was kept.
    Reused(ChangeId),
}

/// Fills in the proposed message of the squashed commit.
pub struct MessagePreparer {
    repo: GitRepository,
    git: GitCli,
    store: Bookkeeping,
}

impl MessagePreparer {
    /// Creates a preparer for an opened repository.
    pub fn new(repo: GitRepository) -> Result<Self> {
        let git = GitCli::new(repo.workdir()?);
        let store = Bookkeeping::for_git_dir(repo.git_dir());
        Ok(Self { repo, git, store })
    }

    /// Rewrites `message_file` for a commit on the scratch branch.
    pub fn prepare(&self, message_file: &Path) -> Result<PrepareOutcome> {
        match self.repo.get_current_branch() {
            Ok(branch) if branch == SCRATCH_BRANCH => {}
            other => {
                debug!("Not on {}: {:?}", SCRATCH_BRANCH, other.ok());
                return Ok(PrepareOutcome::PassThrough);
            }
        }

        let handoff = self.store.read_handoff()?.ok_or_else(|| {
            SquashError::MissingHandOff(self.store.handoff_path().display().to_string())
        })?;
        let branch = handoff.branch.as_str();

        let change_id = match self.store.change_id(branch)? {
            Some(id) if self.is_merged(&id, &handoff.target)? => {
                info!("{} is already merged into {}", id, handoff.target);
                self.store.discard_change_id(branch)?;
                None
            }
            other => other,
        };

        let existing = fs::read_to_string(message_file).with_context(|| {
            format!("Failed to read message file: {}", message_file.display())
        })?;

        let (message, outcome) = match change_id {
            Some(id) => {
                let message = match self.store.cached_message(branch)? {
                    Some(cached) => cached,
                    None => compose_proposed_message(&existing, &id),
                };
                (message, PrepareOutcome::Reused(id))
            }
            None => {
                let id = self.generate_change_id(branch)?;
                self.store.save_change_id(branch, &id)?;
                (
                    compose_proposed_message(&existing, &id),
                    PrepareOutcome::Minted(id),
                )
            }
        };

        fs::write(message_file, message).with_context(|| {
            format!("Failed to write message file: {}", message_file.display())
        })?;

        Ok(outcome)
    }

    /// Whether a commit carrying `change_id` is already in `target`'s history.
    fn is_merged(&self, change_id: &ChangeId, target: &str) -> Result<bool> {
        let grep = format!("--grep={}", change_id.trailer());
        let found = self.git.run(&[
            "log",
            "--fixed-strings",
            &grep,
            "--format=%H",
            "-n",
            "1",
            target,
            "--",
        ])?;
        Ok(!found.is_empty())
    }

    fn generate_change_id(&self, branch: &str) -> Result<ChangeId> {
        let tree = self.git.run(&["write-tree"])?;
        let author = self.git.run(&["var", "GIT_AUTHOR_IDENT"])?;
        let committer = self.git.run(&["var", "GIT_COMMITTER_IDENT"])?;

        Ok(ChangeId::generate(&ChangeIdSeed {
            branch,
            tree: &tree,
            author: &author,
            committer: &committer,
        }))
    }
}
