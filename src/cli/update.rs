//! Update command: syncs the current branch with its target.

use anyhow::Result;
use clap::Parser;

/// Update command options.
#[derive(Parser)]
pub struct UpdateCommand {
    /// Target branch (defaults to git config gerrit-squash.branch, then master).
    #[arg(short = 'b', long = "branch", value_name = "TARGET")]
    pub target: Option<String>,
}

impl UpdateCommand {
    /// Executes the update command.
    pub fn execute(self) -> Result<()> {
        use crate::git::{resolve_target_branch, UpdateHandler};
        use crate::utils::check_git_repository;

        let repo = check_git_repository()?;
        let target = resolve_target_branch(&repo, self.target)?;

        UpdateHandler::new(repo)?.update(&target)?;

        println!("✅ Up to date with '{target}'");
        Ok(())
    }
}
