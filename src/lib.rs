//! # gerrit-squash
//!
//! Squash a working branch into a single commit carrying a stable
//! `Change-Id` trailer and push it to a Gerrit-style review server.
//!
//! Every substantive operation (merge, commit, push) is delegated to the
//! `git` binary. The crate only keeps a little bookkeeping next to the
//! repository: the generated change identifier and the last commit message
//! per branch, plus a hand-off record read by the `prepare-commit-msg` hook.
//!
//! ## Quick Start
//!
//! ```text
//! gerrit-squash init -u ssh://review.example.com:29418
//! gerrit-squash submit
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod data;
pub mod error;
pub mod git;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::error::SquashError;

/// The current version of gerrit-squash.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
