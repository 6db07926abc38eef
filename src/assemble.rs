use std::sync::OnceLock;

use log::{debug, info, warn};
use regex::Regex;

use crate::classify::{classify, LineTag, MESSAGE_INDENT};
use crate::error::GitnetError;
use crate::mode::LogMode;
use crate::record::{CommitKey, CommitRecord, ParseWarning, ParsedLog};

/// First line of every input handed to the parser.
pub const MODE_SIGNATURE: &str = "Mode =";

const HASH_PREFIX: &str = "commit ";

fn digit_run() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    return DIGITS.get_or_init(|| Regex::new(r"\d+").unwrap());
}

/// Parses a whole log blob, header included.
///
/// The blob is split on newlines and empty lines are dropped before the
/// header is checked.
/// ```
/// # use git_netlog::parse_commits;
/// let log = parse_commits("Mode =
/// basic
/// commit 5be676481b4051af62f21eb2c8601b3f6bafb195
/// Author: Jane Doe <jane@example.com>
/// Date:   Thu Feb 16 10:22:31 2017 -0500
///
///     Initial commit
/// ").unwrap();
/// let record = log.get("5be6764").unwrap();
/// assert_eq!(record.author.as_deref(), Some("Jane Doe"));
/// assert_eq!(record.message.as_deref(), Some("Initial commit"));
/// ```
pub fn parse_commits(commit_str: &str) -> Result<ParsedLog, GitnetError> {
    let lines = commit_str
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty());
    return assemble(lines);
}

/// Walks header plus log lines and builds the keyed records.
///
/// The first two lines must be [`MODE_SIGNATURE`] and a mode name. There is
/// no separate mode argument: the mode comes from that header and is stamped
/// on every record, so header and records can't disagree. Lines are expected
/// to be non-empty; an empty line is just an unrecognized one.
/// ```
/// # use git_netlog::{assemble, LogMode};
/// let lines = ["Mode =", "raw", "commit 1111111111111111111111111111111111111111"];
/// let log = assemble(lines).unwrap();
/// assert_eq!(log.mode, LogMode::Raw);
/// assert_eq!(log.get("1111111").unwrap().mode, LogMode::Raw);
/// ```
pub fn assemble<'a, I>(lines: I) -> Result<ParsedLog, GitnetError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines = lines.into_iter();

    let mode_sig = lines.next();
    let mode_name = lines.next();
    if mode_sig != Some(MODE_SIGNATURE) {
        return Err(GitnetError::Parse(format!(
            "expected a string beginning with '{}\\n'.",
            MODE_SIGNATURE
        )));
    }
    let mode = match mode_name.map(str::parse::<LogMode>) {
        Some(Ok(mode)) => mode,
        Some(Err(_)) => {
            return Err(GitnetError::Parse(format!(
                "{} is not a valid mode.",
                mode_name.unwrap_or_default()
            )))
        },
        None => return Err(GitnetError::Parse("no mode follows the signature line.".to_string())),
    };

    let mut assembler = Assembler::new(mode);
    for (idx, line) in lines.enumerate() {
        // Two header lines come first, positions are 1-based.
        assembler.feed(line, idx + 3)?;
    }

    let log = assembler.finish();
    info!(
        "Parsed {} commits in {} mode with {} warnings.",
        log.len(),
        log.mode,
        log.warnings.len()
    );
    return Ok(log);
}

/// Stateful fold over classified lines.
struct Assembler {
    current: Option<CommitKey>,
    log: ParsedLog,
}

impl Assembler {
    fn new(mode: LogMode) -> Self {
        return Self {
            current: None,
            log: ParsedLog::new(mode),
        };
    }

    fn finish(self) -> ParsedLog {
        return self.log;
    }

    fn feed(&mut self, line: &str, line_number: usize) -> Result<(), GitnetError> {
        let tag = classify(line);
        if tag == LineTag::Hash {
            self.start_record(line);
            return Ok(());
        }

        let key = match &self.current {
            Some(key) => key.clone(),
            None => {
                return Err(GitnetError::OrphanLine {
                    line_number,
                    line: line.to_owned(),
                })
            },
        };
        let ParsedLog { commits, warnings, .. } = &mut self.log;
        let Some(record) = commits.get_mut(&key) else {
            return Err(GitnetError::OrphanLine {
                line_number,
                line: line.to_owned(),
            });
        };

        match tag {
            LineTag::Hash => unreachable!("hash lines start a record above"),
            LineTag::Author => set_author(record, &key, line, warnings),
            LineTag::Date => {
                record.date = Some(strip_field(line, "Date:").to_owned());
            },
            LineTag::Message => append_message(record, line),
            LineTag::FileChange => add_change(record, line),
            LineTag::Summary => set_summary(record, &key, line, warnings),
            LineTag::Merge => {
                record.merge = Some(strip_field(line, "Merge:").to_owned());
            },
            LineTag::Ambiguous(rules) => {
                record.errors.push(line.to_owned());
                warnings.push(ParseWarning::Ambiguous {
                    key,
                    line: line.to_owned(),
                    rules,
                });
            },
            LineTag::Unrecognized => {
                record.errors.push(line.to_owned());
                warnings.push(ParseWarning::Unrecognized {
                    key,
                    line: line.to_owned(),
                });
            },
        }
        return Ok(());
    }

    fn start_record(&mut self, line: &str) {
        let hash = &line[HASH_PREFIX.len()..];
        let key = CommitKey(hash.chars().take(CommitKey::LEN).collect());
        debug!("Starting record {} ({}).", key, hash);

        let record = CommitRecord::new(hash, self.log.mode);
        if self.log.commits.insert(key.clone(), record).is_some() {
            warn!("Commit key {} seen twice, replacing the earlier record.", key);
            self.log.warnings.push(ParseWarning::DuplicateKey { key: key.clone() });
        }
        self.current = Some(key);
    }
}

fn strip_field<'a>(line: &'a str, prefix: &str) -> &'a str {
    return line.strip_prefix(prefix).unwrap_or(line).trim();
}

// Drops the single marker character (` ` for stat, `:` for raw).
fn strip_marker(line: &str) -> &str {
    let mut chars = line.chars();
    chars.next();
    return chars.as_str();
}

fn set_author(record: &mut CommitRecord, key: &CommitKey, line: &str, warnings: &mut Vec<ParseWarning>) {
    let rest = line.strip_prefix("Author:").unwrap_or(line);
    match rest.split_once('<') {
        Some((name, email)) => {
            record.author = Some(name.trim().to_owned());
            record.email = Some(email.split('>').next().unwrap_or_default().to_owned());
        },
        None => {
            warn!("No email found in <{}>.", line);
            record.author = Some(rest.trim().to_owned());
            warnings.push(ParseWarning::MissingEmail {
                key: key.clone(),
                line: line.to_owned(),
            });
        },
    }
}

fn append_message(record: &mut CommitRecord, line: &str) {
    let text = line.strip_prefix(MESSAGE_INDENT).unwrap_or(line);
    match record.message.as_mut() {
        Some(message) => {
            message.push(' ');
            message.push_str(text);
        },
        None => record.message = Some(text.to_owned()),
    }
}

fn change_path(line: &str) -> &str {
    if line.starts_with(':') {
        if let Some((_, path)) = line.split_once('\t') {
            return path.trim();
        }
    }
    return line.split('|').next().unwrap_or_default().trim();
}

fn add_change(record: &mut CommitRecord, line: &str) {
    record.changes.push(strip_marker(line).to_owned());
    record.files.push(change_path(line).to_owned());
}

fn set_summary(record: &mut CommitRecord, key: &CommitKey, line: &str, warnings: &mut Vec<ParseWarning>) {
    record.summary = Some(strip_marker(line).to_owned());

    for fragment in line.split(',') {
        let count = digit_run()
            .find(fragment)
            .and_then(|m| m.as_str().parse::<u64>().ok());
        let Some(count) = count else {
            warn!("No number in summary fragment <{}>.", fragment);
            warnings.push(ParseWarning::MalformedSummary {
                key: key.clone(),
                fragment: fragment.trim().to_owned(),
            });
            continue;
        };

        if fragment.contains("file") && fragment.contains("change") {
            record.fedits = Some(count);
        }
        if fragment.contains("insert") {
            record.inserts = Some(count);
        }
        if fragment.contains("delet") {
            record.deletes = Some(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT_LOG: &str = "Mode =
stat
commit 5be676481b4051af62f21eb2c8601b3f6bafb195
Author: Jane Doe <jane@example.com>
Date:   Thu Feb 16 10:22:31 2017 -0500

    fix bug
    in parser

 a/b.py | 2 ++
 3 files changed, 10 insertions(+), 2 deletions(-)
";

    #[test]
    fn test_single_stat_commit() {
        let log = parse_commits(STAT_LOG).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.mode, LogMode::Stat);

        let record = log.get("5be6764").unwrap();
        assert_eq!(record.hash, "5be676481b4051af62f21eb2c8601b3f6bafb195");
        assert_eq!(record.mode, LogMode::Stat);
        assert_eq!(record.author.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email.as_deref(), Some("jane@example.com"));
        assert_eq!(record.date.as_deref(), Some("Thu Feb 16 10:22:31 2017 -0500"));
        assert_eq!(record.message.as_deref(), Some("fix bug in parser"));
        assert_eq!(record.files, vec!["a/b.py"]);
        assert_eq!(record.changes, vec!["a/b.py | 2 ++"]);
        assert_eq!(
            record.summary.as_deref(),
            Some("3 files changed, 10 insertions(+), 2 deletions(-)")
        );
        assert_eq!(record.fedits, Some(3));
        assert_eq!(record.inserts, Some(10));
        assert_eq!(record.deletes, Some(2));
        assert!(record.errors.is_empty());
        assert!(log.warnings.is_empty());
    }

    #[test]
    fn test_parse_is_repeatable() {
        assert_eq!(parse_commits(STAT_LOG).unwrap(), parse_commits(STAT_LOG).unwrap());
    }

    #[test]
    fn test_header_errors() {
        let err = parse_commits("stat\ncommit 5be676481b4051af62f21eb2c8601b3f6bafb195\n").unwrap_err();
        assert!(matches!(err, GitnetError::Parse(_)));

        let err = parse_commits("Mode =\noneline\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input. oneline is not a valid mode.");

        assert!(matches!(parse_commits("Mode =\n").unwrap_err(), GitnetError::Parse(_)));
        assert!(matches!(parse_commits("").unwrap_err(), GitnetError::Parse(_)));
    }

    #[test]
    fn test_header_only_gives_empty_log() {
        let log = parse_commits("Mode =\nbasic\n").unwrap();
        assert!(log.is_empty());
        assert_eq!(log.mode, LogMode::Basic);
    }

    #[test]
    fn test_line_before_hash_fails_fast() {
        let err = parse_commits("Mode =\nbasic\nAuthor: Jane <jane@example.com>\n").unwrap_err();
        match err {
            GitnetError::OrphanLine { line_number, line } => {
                assert_eq!(line_number, 3);
                assert_eq!(line, "Author: Jane <jane@example.com>");
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_merge_and_unrecognized_lines() {
        let log = parse_commits("Mode =
basic
commit 1111111111111111111111111111111111111111
Merge: 2222222 3333333
Author: Jane <jane@example.com>
Signed-off-by: nobody
").unwrap();
        let record = log.get("1111111").unwrap();
        assert_eq!(record.merge.as_deref(), Some("2222222 3333333"));
        assert_eq!(record.errors, vec!["Signed-off-by: nobody"]);
        assert_eq!(
            log.warnings,
            vec![ParseWarning::Unrecognized {
                key: CommitKey::from("1111111"),
                line: "Signed-off-by: nobody".to_string(),
            }]
        );
    }

    #[test]
    fn test_ambiguous_line_goes_to_errors() {
        let log = parse_commits("Mode =
stat
commit 1111111111111111111111111111111111111111
 1 file changed, 2 insertions(+) | odd
").unwrap();
        let record = log.get("1111111").unwrap();
        assert_eq!(record.errors, vec![" 1 file changed, 2 insertions(+) | odd"]);
        assert!(record.summary.is_none());
        assert!(record.files.is_empty());
        assert!(matches!(log.warnings[0], ParseWarning::Ambiguous { .. }));
    }

    #[test]
    fn test_records_keep_first_seen_order() {
        let log = parse_commits("Mode =
basic
commit bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb
    second
commit aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa
    first
").unwrap();
        let keys = log.keys().map(|k| k.as_str()).collect::<Vec<&str>>();
        assert_eq!(keys, vec!["bbbbbbb", "aaaaaaa"]);
        assert_eq!(log.get("aaaaaaa").unwrap().message.as_deref(), Some("first"));
    }

    #[test]
    fn test_duplicate_key_overwrites_in_place() {
        let log = parse_commits("Mode =
basic
commit abcdef1000000000000000000000000000000000
    one
commit 9999999999999999999999999999999999999999
    two
commit abcdef1fffffffffffffffffffffffffffffffff
    three
").unwrap();
        assert_eq!(log.len(), 2);
        let keys = log.keys().map(|k| k.as_str()).collect::<Vec<&str>>();
        assert_eq!(keys, vec!["abcdef1", "9999999"]);

        let record = log.get("abcdef1").unwrap();
        assert_eq!(record.hash, "abcdef1fffffffffffffffffffffffffffffffff");
        assert_eq!(record.message.as_deref(), Some("three"));
        assert_eq!(
            log.warnings,
            vec![ParseWarning::DuplicateKey { key: CommitKey::from("abcdef1") }]
        );
    }

    #[test]
    fn test_raw_change_line_path() {
        let log = parse_commits("Mode =
raw
commit 1111111111111111111111111111111111111111
:100644 100644 bcd1234 0123456 M\tsrc/main.rs
").unwrap();
        let record = log.get("1111111").unwrap();
        assert_eq!(record.mode, LogMode::Raw);
        assert_eq!(record.changes, vec!["100644 100644 bcd1234 0123456 M\tsrc/main.rs"]);
        assert_eq!(record.files, vec!["src/main.rs"]);
    }

    #[test]
    fn test_summary_without_deletions() {
        let log = parse_commits("Mode =
stat
commit 1111111111111111111111111111111111111111
 1 file changed, 1 insertion(+)
").unwrap();
        let record = log.get("1111111").unwrap();
        assert_eq!(record.fedits, Some(1));
        assert_eq!(record.inserts, Some(1));
        assert_eq!(record.deletes, None);
    }

    #[test]
    fn test_summary_fragment_without_digits_is_a_warning() {
        let log = parse_commits("Mode =
stat
commit 1111111111111111111111111111111111111111
 some files changed, 4 insertions(+), many deletions(-)
").unwrap();
        let record = log.get("1111111").unwrap();
        assert_eq!(record.fedits, None);
        assert_eq!(record.inserts, Some(4));
        assert_eq!(record.deletes, None);
        assert_eq!(
            log.warnings,
            vec![
                ParseWarning::MalformedSummary {
                    key: CommitKey::from("1111111"),
                    fragment: "some files changed".to_string(),
                },
                ParseWarning::MalformedSummary {
                    key: CommitKey::from("1111111"),
                    fragment: "many deletions(-)".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_author_without_email() {
        let log = parse_commits("Mode =
basic
commit 1111111111111111111111111111111111111111
Author: Jane Doe
").unwrap();
        let record = log.get("1111111").unwrap();
        assert_eq!(record.author.as_deref(), Some("Jane Doe"));
        assert_eq!(record.email, None);
        assert!(matches!(log.warnings[0], ParseWarning::MissingEmail { .. }));
    }

    #[test]
    fn test_crlf_input() {
        let log = parse_commits("Mode =\r\nbasic\r\ncommit 1111111111111111111111111111111111111111\r\n    hi\r\n").unwrap();
        assert_eq!(log.get("1111111").unwrap().message.as_deref(), Some("hi"));
    }
}
