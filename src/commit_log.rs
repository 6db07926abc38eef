use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Serialize;

use crate::assemble::parse_commits;
use crate::error::GitnetError;
use crate::mode::LogMode;
use crate::record::{CommitKey, CommitRecord, ParsedLog};
use crate::retrieve::retrieve_commits;

/// Where records in a [`CommitLog`] came from.
pub const LOCAL_GIT_SOURCE: &str = "local git";

/// Parsed commits together with where they were read from.
#[derive(Debug, Clone, Serialize)]
pub struct CommitLog {
    /// The parsed records
    pub commits: ParsedLog,
    /// What produced the log
    pub source: String,
    /// Repository or file the log was read from
    pub path: PathBuf,
    /// What the record keys are
    pub key_type: String,
}

/// Retrieves and parses the log of a local repository.
pub fn get_log(path: &Path, mode: LogMode) -> Result<CommitLog, GitnetError> {
    let raw = retrieve_commits(path, mode)?;
    return Ok(CommitLog::new(parse_commits(&raw)?, LOCAL_GIT_SOURCE, path));
}

impl CommitLog {
    /// Wraps a parsed log.
    /// A log from a local git repository is keyed by hash, anything else is "unknown".
    pub fn new(commits: ParsedLog, source: &str, path: &Path) -> Self {
        let key_type = if source == LOCAL_GIT_SOURCE { "hash" } else { "unknown" };
        return Self {
            commits,
            source: source.to_owned(),
            path: path.to_path_buf(),
            key_type: key_type.to_owned(),
        };
    }

    /// Number of commits.
    pub fn len(&self) -> usize {
        return self.commits.len();
    }

    /// Whether there are no commits.
    pub fn is_empty(&self) -> bool {
        return self.commits.is_empty();
    }

    /// Distinct author names, first-seen order.
    /// ```
    /// # use std::path::Path;
    /// # use git_netlog::{parse_commits, CommitLog};
    /// let parsed = parse_commits("Mode =
    /// basic
    /// commit 1111111111111111111111111111111111111111
    /// Author: Ann <ann@example.com>
    /// commit 2222222222222222222222222222222222222222
    /// Author: Bob <bob@example.com>
    /// commit 3333333333333333333333333333333333333333
    /// Author: Ann <ann@example.com>
    /// ").unwrap();
    /// let log = CommitLog::new(parsed, "local git", Path::new("."));
    /// assert_eq!(log.authors(), vec!["Ann", "Bob"]);
    /// assert_eq!(log.by_author("Ann").count(), 2);
    /// ```
    pub fn authors(&self) -> Vec<&str> {
        return self
            .commits
            .iter()
            .filter_map(|(_, record)| record.author.as_deref())
            .collect::<IndexSet<&str>>()
            .into_iter()
            .collect();
    }

    /// Distinct file paths touched by any commit, first-seen order.
    pub fn files(&self) -> Vec<&str> {
        return self
            .commits
            .iter()
            .flat_map(|(_, record)| record.files.iter().map(String::as_str))
            .collect::<IndexSet<&str>>()
            .into_iter()
            .collect();
    }

    /// Commits written by `author`.
    pub fn by_author<'a>(&'a self, author: &'a str) -> impl Iterator<Item = (&'a CommitKey, &'a CommitRecord)> + 'a {
        return self
            .commits
            .iter()
            .filter(move |(_, record)| record.author.as_deref() == Some(author));
    }

    /// A copy holding only the commits written by `author`, along with the
    /// warnings raised for those commits.
    pub fn for_author(&self, author: &str) -> CommitLog {
        let mut commits = ParsedLog::new(self.commits.mode);
        commits.commits = self
            .by_author(author)
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        commits.warnings = self
            .commits
            .warnings
            .iter()
            .filter(|warning| commits.commits.contains_key(warning.key()))
            .cloned()
            .collect();

        return Self {
            commits,
            source: self.source.clone(),
            path: self.path.clone(),
            key_type: self.key_type.clone(),
        };
    }

    /// Pretty printed JSON of the whole log.
    pub fn to_json(&self) -> serde_json::Result<String> {
        return serde_json::to_string_pretty(self);
    }
}
