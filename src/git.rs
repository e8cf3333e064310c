//! Git operations and repository management.

pub mod command;
pub mod prepare;
pub mod remote;
pub mod repository;
pub mod setup;
pub mod submit;
pub mod update;

pub use command::GitCli;
pub use prepare::{MessagePreparer, PrepareOutcome};
pub use remote::RemoteInfo;
pub use repository::GitRepository;
pub use setup::SetupHandler;
pub use submit::{PushTarget, SubmitHandler};
pub use update::UpdateHandler;

/// Name of the remote pointing at the review server.
pub const REVIEW_REMOTE: &str = "gerrit";

/// Transient branch holding the squashed commit.
pub const SCRATCH_BRANCH: &str = "gerrit-squash-scratch";

/// Target branch used when neither the command line nor git config names one.
pub const DEFAULT_TARGET_BRANCH: &str = "master";

/// Git config key holding the review server base URL.
pub const CONFIG_URL_KEY: &str = "gerrit-squash.url";

/// Git config key holding the default target branch.
pub const CONFIG_BRANCH_KEY: &str = "gerrit-squash.branch";

/// Resolves the target branch: explicit value, then git config, then the default.
pub fn resolve_target_branch(
    repo: &GitRepository,
    explicit: Option<String>,
) -> anyhow::Result<String> {
    if let Some(branch) = explicit {
        return Ok(branch);
    }

    Ok(repo
        .config_string(CONFIG_BRANCH_KEY)?
        .unwrap_or_else(|| DEFAULT_TARGET_BRANCH.to_string()))
}
