//! Bringing the working branch up to date with its target.

use anyhow::{Context, Result};
use tracing::info;

use crate::error::SquashError;
use crate::git::{GitCli, GitRepository};
use crate::utils::check_working_directory_clean;

/// Fast-forwards the target and merges it into the working branch.
pub struct UpdateHandler {
    repo: GitRepository,
    git: GitCli,
}

impl UpdateHandler {
    /// Creates an update handler for an opened repository.
    pub fn new(repo: GitRepository) -> Result<Self> {
        let git = GitCli::new(repo.workdir()?);
        Ok(Self { repo, git })
    }

    /// Fast-forwards `target` from its upstream, then merges it into the
    /// current branch. On a failed fast-forward `target` stays checked out.
    pub fn update(&self, target: &str) -> Result<()> {
        check_working_directory_clean(&self.repo)?;
        let branch = self.repo.get_current_branch()?;

        if branch != target {
            self.git
                .run(&["checkout", target])
                .with_context(|| format!("Failed to check out {target}"))?;
        }

        println!("⏩ Fast-forwarding '{target}'...");
        if !self.git.run_interactive(&["pull", "--ff-only"])? {
            return Err(SquashError::FastForwardFailed(target.to_string()).into());
        }

        if branch == target {
            return Ok(());
        }

        self.git
            .run(&["checkout", &branch])
            .with_context(|| format!("Failed to return to {branch}"))?;

        println!("🔀 Merging '{target}' into '{branch}'...");
        if !self.git.run_interactive(&["merge", "--no-edit", target])? {
            return Err(SquashError::MergeFailed {
                target: target.to_string(),
                branch,
            }
            .into());
        }

        info!("Updated {} from {}", branch, target);
        Ok(())
    }
}
