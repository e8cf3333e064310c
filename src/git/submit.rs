//! Squash-and-submit workflow.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::data::{Bookkeeping, ChangeId, HandOff};
use crate::error::SquashError;
use crate::git::{GitCli, GitRepository, REVIEW_REMOTE, SCRATCH_BRANCH};
use crate::utils::check_submit_prerequisites;

/// Ref namespace a change is pushed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushTarget {
    /// `refs/for/<target>`: a regular change.
    Review,
    /// `refs/drafts/<target>`: a draft change.
    Draft,
}

impl PushTarget {
    /// Chooses the namespace from the `--draft` flag.
    pub fn from_draft_flag(draft: bool) -> Self {
        if draft {
            Self::Draft
        } else {
            Self::Review
        }
    }

    /// The ref namespace.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Review => "refs/for",
            Self::Draft => "refs/drafts",
        }
    }

    /// Refspec pushing HEAD for review against `target`.
    pub fn refspec(self, target: &str) -> String {
        format!("HEAD:{}/{}", self.namespace(), target)
    }
}

/// Outcome of a successful submission.
#[derive(Debug)]
pub struct SubmitReport {
    /// Working branch that was squashed.
    pub branch: String,
    /// Refspec that was pushed.
    pub refspec: String,
    /// Identifier the change was pushed with.
    pub change_id: Option<ChangeId>,
}

/// Squashes the working branch onto the target and pushes it for review.
pub struct SubmitHandler {
    repo: GitRepository,
    git: GitCli,
    store: Bookkeeping,
}

impl SubmitHandler {
    /// Creates a submit handler for an opened repository.
    pub fn new(repo: GitRepository) -> Result<Self> {
        let git = GitCli::new(repo.workdir()?);
        let store = Bookkeeping::for_git_dir(repo.git_dir());
        Ok(Self { repo, git, store })
    }

    /// Runs the whole submission. Any failure after the scratch branch is
    /// checked out resets it and returns to the working branch.
    pub fn submit(&self, target: &str, push_target: PushTarget) -> Result<SubmitReport> {
        let branch = check_submit_prerequisites(&self.repo, target)?;
        if !self.repo.branch_exists(target) {
            anyhow::bail!("Target branch '{target}' does not exist");
        }

        self.store.write_handoff(&HandOff {
            branch: branch.clone(),
            target: target.to_string(),
        })?;

        println!("🔄 Squashing '{branch}' onto '{target}'...");
        self.git
            .run(&["checkout", "-B", SCRATCH_BRANCH, target])
            .with_context(|| format!("Failed to reset {SCRATCH_BRANCH} to {target}"))?;

        if !self.git.run_interactive(&["merge", "--squash", &branch])? {
            self.restore(&branch);
            return Err(SquashError::MergeConflict {
                branch,
                target: target.to_string(),
            }
            .into());
        }

        if self.git.succeeds(&["diff", "--cached", "--quiet"])? {
            self.restore(&branch);
            return Err(SquashError::NothingToMerge(branch).into());
        }

        // Runs the prepare-commit-msg hook and the user's editor
        if !self.git.run_interactive(&["commit"])? {
            self.restore(&branch);
            return Err(SquashError::CommitAborted.into());
        }

        let refspec = push_target.refspec(target);
        println!("📤 Pushing to {REVIEW_REMOTE} {refspec}");
        if !self
            .git
            .run_interactive(&["push", REVIEW_REMOTE, &refspec])?
        {
            self.restore(&branch);
            return Err(SquashError::PushFailed(format!("{REVIEW_REMOTE} {refspec}")).into());
        }

        let message = self.git.run(&["log", "-1", "--format=%B"])?;
        self.store.save_message(&branch, &format!("{message}\n"))?;
        let change_id = ChangeId::find_in_message(&message);
        info!("Submitted {} as {:?}", branch, change_id);

        self.git
            .run(&["checkout", &branch])
            .with_context(|| format!("Failed to return to {branch}"))?;

        Ok(SubmitReport {
            branch,
            refspec,
            change_id,
        })
    }

    /// Discards the scratch work and checks the working branch out again.
    /// Best effort: the error that triggered the restore is what gets reported.
    fn restore(&self, branch: &str) {
        for args in [vec!["reset", "--hard"], vec!["checkout", branch]] {
            if let Err(e) = self.git.run(&args) {
                debug!("Restore step git {} failed: {e}", args.join(" "));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_target_follows_draft_flag() {
        assert_eq!(PushTarget::from_draft_flag(false), PushTarget::Review);
        assert_eq!(PushTarget::from_draft_flag(true), PushTarget::Draft);
    }

    #[test]
    fn refspecs_use_gerrit_namespaces() {
        assert_eq!(
            PushTarget::Review.refspec("master"),
            "HEAD:refs/for/master"
        );
        assert_eq!(
            PushTarget::Draft.refspec("release/1.0"),
            "HEAD:refs/drafts/release/1.0"
        );
    }
}
