//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{
    check_git_repository, check_not_target, check_review_remote, check_submit_prerequisites,
    check_working_directory_clean,
};
pub use settings::{get_env_var, resolve_review_url, Settings};
