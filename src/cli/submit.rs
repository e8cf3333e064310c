//! Submit command: squashes the current branch and pushes it for review.

use anyhow::Result;
use clap::Parser;

/// Submit command options.
#[derive(Parser)]
pub struct SubmitCommand {
    /// Target branch (defaults to git config gerrit-squash.branch, then master).
    #[arg(short = 'b', long = "branch", value_name = "TARGET")]
    pub target: Option<String>,

    /// Push as a draft change (refs/drafts/) instead of for review (refs/for/).
    #[arg(short = 'd', long)]
    pub draft: bool,
}

impl SubmitCommand {
    /// Executes the submit command.
    pub fn execute(self) -> Result<()> {
        use crate::git::{resolve_target_branch, PushTarget, SubmitHandler};
        use crate::utils::check_git_repository;

        let repo = check_git_repository()?;
        let target = resolve_target_branch(&repo, self.target)?;

        let handler = SubmitHandler::new(repo)?;
        let report = handler.submit(&target, PushTarget::from_draft_flag(self.draft))?;

        match report.change_id {
            Some(change_id) => println!(
                "✅ Submitted '{}' to {} as {}",
                report.branch, report.refspec, change_id
            ),
            None => println!("✅ Submitted '{}' to {}", report.branch, report.refspec),
        }
        Ok(())
    }
}
