//! New command: starts a fresh change for the current branch.

use anyhow::Result;
use clap::Parser;

/// New command options.
#[derive(Parser)]
pub struct NewCommand {}

impl NewCommand {
    /// Executes the new command.
    pub fn execute(self) -> Result<()> {
        use crate::data::Bookkeeping;
        use crate::utils::check_git_repository;

        let repo = check_git_repository()?;
        let branch = repo.get_current_branch()?;

        let removed = Bookkeeping::for_git_dir(repo.git_dir()).clear_branch(&branch)?;

        if removed.is_empty() {
            println!("Nothing recorded for '{branch}'");
        } else {
            for path in &removed {
                println!("🗑️  Removed {}", path.display());
            }
            println!("✅ Next submit of '{branch}' starts a new change");
        }
        Ok(())
    }
}
