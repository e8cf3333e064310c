//! Workflow error handling.

use thiserror::Error;

/// Failures of the squash-and-submit workflow.
///
/// Everything here ends the process with status 1; the variants only exist
/// so callers and tests can tell the categories apart.
#[derive(Error, Debug)]
pub enum SquashError {
    /// No review server URL on the command line, in git config or in the environment.
    #[error(
        "No review server URL configured. Pass -u <url>, set git config gerrit-squash.url or export GERRIT_SQUASH_URL"
    )]
    NoReviewUrl,

    /// The project name could not be derived from the origin remote.
    #[error("Cannot determine the project name from the origin remote. Pass -p <project>")]
    NoProjectName,

    /// The review remote has not been set up.
    #[error("Remote '{0}' is not configured. Run 'gerrit-squash init' first")]
    NotInitialized(String),

    /// HEAD does not point at a branch.
    #[error("Repository is in detached HEAD state")]
    DetachedHead,

    /// The working branch is the branch being submitted to.
    #[error("Current branch '{0}' is the target branch. Switch to a working branch first")]
    SameBranch(String),

    /// Tracked files have uncommitted changes.
    #[error("Working directory has uncommitted changes:\n{0}\nPlease commit or stash your changes before proceeding.")]
    DirtyWorkingTree(String),

    /// The target branch could not be fast-forwarded from its upstream.
    #[error("Failed to fast-forward '{0}'. Resolve the conflicts manually; '{0}' is left checked out")]
    FastForwardFailed(String),

    /// Merging the target back into the working branch failed.
    #[error("Failed to merge '{target}' into '{branch}'. Resolve the conflicts and commit")]
    MergeFailed {
        /// Branch that was merged.
        target: String,
        /// Branch being merged into.
        branch: String,
    },

    /// The squash merge produced conflicts.
    #[error("Merge conflict while squashing '{branch}' onto '{target}'. Update '{branch}' and try again")]
    MergeConflict {
        /// Working branch.
        branch: String,
        /// Target branch.
        target: String,
    },

    /// The squash merge staged nothing.
    #[error("Nothing to merge from '{0}'. Commit your changes first")]
    NothingToMerge(String),

    /// `git commit` did not produce a commit.
    #[error("Commit was aborted")]
    CommitAborted,

    /// Pushing to the review server failed.
    #[error("Failed to push to {0}")]
    PushFailed(String),

    /// The hook ran without a hand-off record from `submit`.
    #[error("No current branch recorded in {0}. Run 'gerrit-squash submit' instead of committing on the scratch branch")]
    MissingHandOff(String),

    /// A git invocation exited unsuccessfully.
    #[error("git {command} failed: {stderr}")]
    GitCommandFailed {
        /// Arguments passed to git.
        command: String,
        /// Captured standard error.
        stderr: String,
    },
}
