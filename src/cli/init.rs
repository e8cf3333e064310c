//! Init command: configures the review remote and installs the hook.

use std::env;

use anyhow::{Context, Result};
use clap::Parser;

/// Init command options.
#[derive(Parser)]
pub struct InitCommand {
    /// Review server base URL (defaults to git config gerrit-squash.url or GERRIT_SQUASH_URL).
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,

    /// Project name on the review server (defaults to the origin remote's basename).
    #[arg(short = 'p', long, value_name = "PROJECT")]
    pub project: Option<String>,
}

impl InitCommand {
    /// Executes the init command.
    pub fn execute(self) -> Result<()> {
        use crate::git::SetupHandler;
        use crate::utils::check_git_repository;

        let repo = check_git_repository()?;
        let exe = env::current_exe().context("Failed to locate the gerrit-squash executable")?;

        let handler = SetupHandler::new(repo)?;
        let report = handler.run(self.url.as_deref(), self.project.as_deref(), &exe)?;

        println!("✅ Remote '{}' -> {}", report.remote.name, report.remote.uri);
        println!("✅ Installed hook {}", report.hook_path.display());
        Ok(())
    }
}
