use core::fmt;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::classify::Rule;
use crate::mode::LogMode;

/// Date layout of the `Date:` line in default `git log` output.
pub const GIT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

/// Abbreviated commit hash used as the record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitKey(pub String);

impl CommitKey {
    /// Number of hash characters kept in a key.
    pub const LEN: usize = 7;

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for CommitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}

impl From<&str> for CommitKey {
    fn from(value: &str) -> Self {
        return CommitKey(value.to_owned());
    }
}

/// Names accepted by [`CommitRecord::get`].
pub const FIELD_NAMES: [&str; 14] = [
    "hash", "mode", "author", "email", "date", "message", "merge", "summary",
    "changes", "files", "fedits", "inserts", "deletes", "errors",
];

/// Everything collected for one commit.
/// Fields stay `None` (or empty) until a line provides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Full 40 character hash
    pub hash: String,
    /// Mode the log was retrieved in
    pub mode: LogMode,
    /// Author name
    pub author: Option<String>,
    /// Author email, without the angle brackets
    pub email: Option<String>,
    /// Author date, as printed by git
    pub date: Option<String>,
    /// Message lines joined by single spaces
    pub message: Option<String>,
    /// Parent hashes of a merge commit, as printed by git
    pub merge: Option<String>,
    /// The `--stat` totals line
    pub summary: Option<String>,
    /// Change lines in the order they appeared
    #[serde(serialize_with = "empty_as_null")]
    pub changes: Vec<String>,
    /// Paths touched, parallel to `changes`
    #[serde(serialize_with = "empty_as_null")]
    pub files: Vec<String>,
    /// Number of files changed
    pub fedits: Option<u64>,
    /// Lines inserted
    pub inserts: Option<u64>,
    /// Lines deleted
    pub deletes: Option<u64>,
    /// Lines that were ambiguous or unrecognized while this record was current
    #[serde(serialize_with = "empty_as_null")]
    pub errors: Vec<String>,
}

// Absent list fields export as `null`, like absent scalars.
fn empty_as_null<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    if values.is_empty() {
        return serializer.serialize_none();
    }
    return serializer.collect_seq(values);
}

/// A borrowed view of one record field, returned by [`CommitRecord::get`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue<'a> {
    /// String fields
    Text(&'a str),
    /// Numeric summary fields
    Count(u64),
    /// List fields
    List(&'a [String]),
    /// The retrieval mode
    Mode(LogMode),
}

impl CommitRecord {
    /// Starts a record from a full hash and the retrieval mode.
    pub fn new(hash: &str, mode: LogMode) -> Self {
        return Self {
            hash: hash.to_owned(),
            mode,
            author: None,
            email: None,
            date: None,
            message: None,
            merge: None,
            summary: None,
            changes: Vec::new(),
            files: Vec::new(),
            fedits: None,
            inserts: None,
            deletes: None,
            errors: Vec::new(),
        };
    }

    /// Looks a field up by name. Unset fields, empty lists and unknown names
    /// all give `None`.
    /// ```
    /// # use git_netlog::{CommitRecord, FieldValue, LogMode};
    /// let mut record = CommitRecord::new("5be676481b4051af62f21eb2c8601b3f6bafb195", LogMode::Stat);
    /// record.inserts = Some(4);
    /// assert_eq!(record.get("inserts"), Some(FieldValue::Count(4)));
    /// assert_eq!(record.get("deletes"), None);
    /// assert_eq!(record.get("files"), None);
    /// assert_eq!(record.get("mode"), Some(FieldValue::Mode(LogMode::Stat)));
    /// ```
    pub fn get(&self, field: &str) -> Option<FieldValue<'_>> {
        fn list(values: &[String]) -> Option<FieldValue<'_>> {
            if values.is_empty() {
                None
            } else {
                Some(FieldValue::List(values))
            }
        }

        match field {
            "hash" => Some(FieldValue::Text(&self.hash)),
            "mode" => Some(FieldValue::Mode(self.mode)),
            "author" => self.author.as_deref().map(FieldValue::Text),
            "email" => self.email.as_deref().map(FieldValue::Text),
            "date" => self.date.as_deref().map(FieldValue::Text),
            "message" => self.message.as_deref().map(FieldValue::Text),
            "merge" => self.merge.as_deref().map(FieldValue::Text),
            "summary" => self.summary.as_deref().map(FieldValue::Text),
            "changes" => list(&self.changes),
            "files" => list(&self.files),
            "fedits" => self.fedits.map(FieldValue::Count),
            "inserts" => self.inserts.map(FieldValue::Count),
            "deletes" => self.deletes.map(FieldValue::Count),
            "errors" => list(&self.errors),
            _ => None,
        }
    }

    /// Splits the merge field into individual parent hashes.
    pub fn merge_parents(&self) -> Vec<&str> {
        return self
            .merge
            .as_deref()
            .map(|m| m.split_whitespace().collect())
            .unwrap_or_default();
    }

    /// Parses the date field, if it is in git's default layout.
    /// ```
    /// # use git_netlog::{CommitRecord, LogMode};
    /// let mut record = CommitRecord::new("5be676481b4051af62f21eb2c8601b3f6bafb195", LogMode::Basic);
    /// record.date = Some("Thu Feb 16 10:22:31 2017 -0500".to_string());
    /// assert_eq!(record.timestamp().unwrap().timestamp(), 1487258551);
    /// ```
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let date = self.date.as_deref()?;
        return DateTime::parse_from_str(date.trim(), GIT_DATE_FORMAT).ok();
    }
}

/// Non-fatal problems noticed while assembling records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A line matched several patterns.
    Ambiguous {
        /// Record the line was filed under
        key: CommitKey,
        /// The line itself
        line: String,
        /// Every rule that fired
        rules: Vec<Rule>,
    },
    /// A line matched no pattern.
    Unrecognized {
        /// Record the line was filed under
        key: CommitKey,
        /// The line itself
        line: String,
    },
    /// A summary fragment had no digits; its count was left unset.
    MalformedSummary {
        /// Record the summary belongs to
        key: CommitKey,
        /// The comma separated piece without a number
        fragment: String,
    },
    /// An author line had no `<email>` part.
    MissingEmail {
        /// Record the author line belongs to
        key: CommitKey,
        /// The line itself
        line: String,
    },
    /// A second hash line produced an existing key and replaced its record.
    DuplicateKey {
        /// The colliding key
        key: CommitKey,
    },
}

impl ParseWarning {
    /// Record the warning was raised for.
    pub fn key(&self) -> &CommitKey {
        match self {
            ParseWarning::Ambiguous { key, .. }
            | ParseWarning::Unrecognized { key, .. }
            | ParseWarning::MalformedSummary { key, .. }
            | ParseWarning::MissingEmail { key, .. }
            | ParseWarning::DuplicateKey { key } => key,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::Ambiguous { key, line, rules } => write!(
                f,
                "[{}] <{}> matched multiple patterns ({})",
                key,
                line,
                rules.iter().map(|r| r.to_string()).collect::<Vec<String>>().join(", "),
            ),
            ParseWarning::Unrecognized { key, line } => {
                write!(f, "[{}] <{}> did not match any pattern", key, line)
            },
            ParseWarning::MalformedSummary { key, fragment } => {
                write!(f, "[{}] no number in summary fragment <{}>", key, fragment)
            },
            ParseWarning::MissingEmail { key, line } => {
                write!(f, "[{}] no email in author line <{}>", key, line)
            },
            ParseWarning::DuplicateKey { key } => {
                write!(f, "[{}] duplicate commit key, earlier record replaced", key)
            },
        }
    }
}

/// Result of a parse pass: records keyed by abbreviated hash, in the order
/// their hash lines were first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLog {
    /// Mode named in the input header
    pub mode: LogMode,
    /// The records
    pub commits: IndexMap<CommitKey, CommitRecord>,
    /// Everything that went wrong without stopping the pass
    pub warnings: Vec<ParseWarning>,
}

impl ParsedLog {
    /// An empty log for the given mode.
    pub fn new(mode: LogMode) -> Self {
        return Self {
            mode,
            commits: IndexMap::new(),
            warnings: Vec::new(),
        };
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        return self.commits.len();
    }

    /// Whether no record was found.
    pub fn is_empty(&self) -> bool {
        return self.commits.is_empty();
    }

    /// Record for an abbreviated hash.
    pub fn get(&self, key: &str) -> Option<&CommitRecord> {
        return self.commits.get(&CommitKey::from(key));
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &CommitKey> {
        return self.commits.keys();
    }

    /// `(key, record)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&CommitKey, &CommitRecord)> {
        return self.commits.iter();
    }
}

impl IntoIterator for ParsedLog {
    type Item = (CommitKey, CommitRecord);
    type IntoIter = indexmap::map::IntoIter<CommitKey, CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        return self.commits.into_iter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CommitRecord {
        return CommitRecord::new("5be676481b4051af62f21eb2c8601b3f6bafb195", LogMode::Stat);
    }

    #[test]
    fn test_get_covers_every_field_name() {
        let mut rec = record();
        rec.author = Some("Jane".to_string());
        rec.email = Some("jane@example.com".to_string());
        rec.date = Some("Mon Jan 2 15:04:05 2006 -0700".to_string());
        rec.message = Some("msg".to_string());
        rec.merge = Some("1a2b3c4 5d6e7f8".to_string());
        rec.summary = Some("1 file changed".to_string());
        rec.changes.push("a | 1 +".to_string());
        rec.files.push("a".to_string());
        rec.fedits = Some(1);
        rec.inserts = Some(1);
        rec.deletes = Some(0);
        rec.errors.push("???".to_string());

        for name in FIELD_NAMES {
            assert!(rec.get(name).is_some(), "field {} missing", name);
        }
        assert_eq!(rec.get("nope"), None);
    }

    #[test]
    fn test_unset_fields_are_absent() {
        let rec = record();
        for name in ["author", "email", "date", "message", "merge", "summary",
                     "changes", "files", "fedits", "inserts", "deletes", "errors"] {
            assert_eq!(rec.get(name), None, "field {} should be unset", name);
        }
    }

    #[test]
    fn test_merge_parents() {
        let mut rec = record();
        assert!(rec.merge_parents().is_empty());
        rec.merge = Some("1a2b3c4 5d6e7f8".to_string());
        assert_eq!(rec.merge_parents(), vec!["1a2b3c4", "5d6e7f8"]);
    }

    #[test]
    fn test_timestamp_single_digit_day() {
        let mut rec = record();
        rec.date = Some("Mon Jan 2 15:04:05 2006 -0700".to_string());
        let ts = rec.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1136239445);

        rec.date = Some("yesterday".to_string());
        assert!(rec.timestamp().is_none());
    }

    #[test]
    fn test_serializes_absent_fields_as_null() {
        let mut rec = record();
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["author"], serde_json::Value::Null);
        assert_eq!(json["mode"], "stat");
        for name in ["changes", "files", "errors"] {
            assert_eq!(json[name], serde_json::Value::Null, "field {} should be null", name);
        }

        rec.files.push("src/lib.rs".to_string());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["files"], serde_json::json!(["src/lib.rs"]));
        assert_eq!(json["changes"], serde_json::Value::Null);
    }
}
