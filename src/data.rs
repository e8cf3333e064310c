//! Bookkeeping data: change identifiers, commit messages and their on-disk store.

pub mod change_id;
pub mod message;
pub mod store;

pub use change_id::{ChangeId, ChangeIdSeed};
pub use message::{compose_proposed_message, strip_squash_boilerplate};
pub use store::{branch_key, Bookkeeping, HandOff};
