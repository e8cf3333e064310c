//! Preflight validation checks for early failure detection
//!
//! Commands call these before touching the working tree so that a failed
//! precondition never leaves the repository half-modified.

use anyhow::{Context, Result};

use crate::error::SquashError;
use crate::git::{GitRepository, RemoteInfo, REVIEW_REMOTE};

/// Validate we're in a valid git repository and open it
pub fn check_git_repository() -> Result<GitRepository> {
    GitRepository::open().context(
        "Not in a git repository. Please run this command from within a git repository.",
    )
}

/// Validate tracked files have no uncommitted changes
///
/// This checks for staged changes and unstaged modifications. Untracked
/// files are ignored since neither merging nor pushing touches them.
pub fn check_working_directory_clean(repo: &GitRepository) -> Result<()> {
    let status = repo
        .get_working_directory_status()
        .context("Failed to get working directory status")?;

    if !status.clean {
        return Err(SquashError::DirtyWorkingTree(status.describe()).into());
    }

    Ok(())
}

/// Validate `init` has configured the review remote
pub fn check_review_remote(repo: &GitRepository) -> Result<RemoteInfo> {
    RemoteInfo::find(repo.repository(), REVIEW_REMOTE)?
        .ok_or_else(|| SquashError::NotInitialized(REVIEW_REMOTE.to_string()).into())
}

/// Validate the working branch is not the branch being submitted to
pub fn check_not_target(branch: &str, target: &str) -> Result<()> {
    if branch == target {
        return Err(SquashError::SameBranch(branch.to_string()).into());
    }
    Ok(())
}

/// Combined preflight check for submit
///
/// Validates, in order:
/// - the review remote exists
/// - HEAD is on a branch other than the target
/// - tracked files are clean
///
/// Returns the working branch name.
pub fn check_submit_prerequisites(repo: &GitRepository, target: &str) -> Result<String> {
    check_review_remote(repo)?;
    let branch = repo.get_current_branch()?;
    check_not_target(&branch, target)?;
    check_working_directory_clean(repo)?;
    Ok(branch)
}
