//! Proposed commit message composition for squashed commits.

use std::sync::LazyLock;

use regex::Regex;

use crate::data::ChangeId;

/// Header git writes at the top of a `merge --squash` message.
const SQUASH_HEADER: &str = "Squashed commit of the following:";

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SQUASHED_COMMIT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(commit [0-9a-f]{7,}|(Author|Date|Merge):.*)$").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CHANGE_ID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Change-Id:").unwrap());

/// Cut line written by `commit.verbose` and `commit.cleanup=scissors`; git
/// drops it and everything below it.
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SCISSORS_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^# -+ >8 -+$").unwrap());

/// Removes squash boilerplate and stale `Change-Id` lines from a message.
///
/// Squash messages lose their header, the per-commit `commit`/`Author:`/
/// `Date:`/`Merge:` lines and the indentation of the squashed messages.
/// Blank line runs collapse to one and the result is trimmed.
pub fn strip_squash_boilerplate(message: &str) -> String {
    let is_squash = message.lines().any(|line| line.trim() == SQUASH_HEADER);

    let mut kept: Vec<&str> = Vec::new();
    for line in message.lines() {
        if CHANGE_ID_LINE.is_match(line) {
            continue;
        }

        let line = if is_squash {
            if line.trim() == SQUASH_HEADER || SQUASHED_COMMIT_HEADER.is_match(line) {
                continue;
            }
            line.strip_prefix("    ").unwrap_or(line)
        } else {
            line
        };

        let line = line.trim_end();
        if line.is_empty() && kept.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        kept.push(line);
    }

    while kept.last().is_some_and(|line| line.is_empty()) {
        kept.pop();
    }

    kept.join("\n")
}

/// Builds the message proposed for a newly identified change: the cleaned up
/// existing text, then the `Change-Id` trailer. Git's comment block stays
/// below the trailer, and a scissors section is carried over untouched.
pub fn compose_proposed_message(existing: &str, change_id: &ChangeId) -> String {
    let (text, scissors) = split_at_scissors(existing);
    let cleaned = strip_squash_boilerplate(text);
    let lines: Vec<&str> = cleaned.lines().collect();

    // Git comments start at the first `#` line; the trailer goes above them
    let comments_start = lines
        .iter()
        .position(|line| line.starts_with('#'))
        .unwrap_or(lines.len());

    let body = lines[..comments_start].join("\n");
    let body = body.trim_end();
    let comments = lines[comments_start..].join("\n");
    let comments = comments.trim();

    let mut message = String::new();
    if !body.is_empty() {
        message.push_str(body);
        message.push_str("\n\n");
    }
    message.push_str(&change_id.trailer());
    message.push('\n');
    if !comments.is_empty() {
        message.push('\n');
        message.push_str(comments);
        message.push('\n');
    }
    message.push_str(scissors);

    message
}

/// Splits `message` before its first scissors line.
fn split_at_scissors(message: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in message.split_inclusive('\n') {
        if SCISSORS_LINE.is_match(line.trim_end()) {
            return message.split_at(offset);
        }
        offset += line.len();
    }
    (message, "")
}
