//! CLI interface for gerrit-squash.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod init;
pub mod new;
pub mod prepare;
pub mod submit;
pub mod update;

/// gerrit-squash: squash a working branch into one commit and submit it for review.
#[derive(Parser)]
#[command(name = "gerrit-squash")]
#[command(
    about = "Squash a working branch into one Change-Id tagged commit and submit it to Gerrit",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Configures the review remote and installs the commit message hook.
    Init(init::InitCommand),
    /// Fast-forwards the target branch and merges it into the current branch.
    Update(update::UpdateCommand),
    /// Squashes the current branch onto the target and pushes it for review.
    Submit(submit::SubmitCommand),
    /// Forgets the change identifier and message of the current branch.
    New(new::NewCommand),
    /// Prepares the squashed commit message (run by the git hook).
    #[command(name = "prepare-commit-msg", hide = true)]
    PrepareCommitMsg(prepare::PrepareCommitMsgCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init(init_cmd) => init_cmd.execute(),
            Commands::Update(update_cmd) => update_cmd.execute(),
            Commands::Submit(submit_cmd) => submit_cmd.execute(),
            Commands::New(new_cmd) => new_cmd.execute(),
            Commands::PrepareCommitMsg(prepare_cmd) => prepare_cmd.execute(),
        }
    }
}
