#![warn(missing_docs)]

//! git-netlog is a library for turning `git log` output into commit records
//! It reads the text printed by `git log`, `git log --raw` or `git log --stat`
//! and gives back one record per commit, keyed by abbreviated hash, ready to be
//! turned into author / file networks.
//! ```
//! # use git_netlog::{parse_commits, FieldValue};
//! # fn main() -> Result<(), git_netlog::GitnetError> {
//! let log = parse_commits("Mode =
//! stat
//! commit 5be676481b4051af62f21eb2c8601b3f6bafb195
//! Author: Jane Doe <jane@example.com>
//! Date:   Thu Feb 16 10:22:31 2017 -0500
//!
//!     Add parser
//!
//!  src/parser.rs | 40 ++++++++++++++++++++++++++++++++++++++++
//!  1 file changed, 40 insertions(+)
//! ")?;
//!
//! let record = log.get("5be6764").unwrap();
//! assert_eq!(record.get("inserts"), Some(FieldValue::Count(40)));
//! assert_eq!(record.files, vec!["src/parser.rs"]);
//! # return Ok(());
//! # }
//! ```

/// The classify module identifies single log lines, see [`classify::classify`].
pub mod classify;

/// The assemble module folds classified lines into records, see [`assemble::parse_commits`].
pub mod assemble;

/// The record module holds [`record::CommitRecord`], [`record::ParsedLog`] and friends.
pub mod record;

/// The mode module holds the [`mode::LogMode`] enum.
pub mod mode;

/// The error module holds [`error::GitnetError`].
pub mod error;

/// The retrieve module runs `git log` for a repository.
pub mod retrieve;

/// The commit_log module wraps parsed records with their provenance.
pub mod commit_log;

/// The macro module is for the macros included in this library. This includes
/// the [`macros::ok_or_continue`] macro.
pub mod macros;

pub use crate::assemble::{assemble, parse_commits};
pub use crate::classify::{classify, LineTag, Rule};
pub use crate::commit_log::{get_log, CommitLog};
pub use crate::error::GitnetError;
pub use crate::mode::LogMode;
pub use crate::record::{CommitKey, CommitRecord, FieldValue, ParseWarning, ParsedLog};
