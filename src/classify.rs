use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

/// Width of a `commit <40 hex chars>` header line.
pub const HASH_LINE_LEN: usize = 47;

/// Indent git uses for commit message lines.
pub const MESSAGE_INDENT: &str = "    ";

/// One of the structural patterns a log line can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// `commit <hash>`
    Hash,
    /// `Author: name <email>`
    Author,
    /// `Date:   ...`
    Date,
    /// Four space indented message text
    Message,
    /// A `--stat` or `--raw` per file line
    FileChange,
    /// The `--stat` totals line
    Summary,
    /// `Merge: parent parent`
    Merge,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Hash => "hash",
            Rule::Author => "author",
            Rule::Date => "date",
            Rule::Message => "message",
            Rule::FileChange => "change",
            Rule::Summary => "summary",
            Rule::Merge => "merge",
        };
        return write!(f, "{}", name);
    }
}

/// What a single log line was identified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTag {
    /// Commit header carrying the full hash
    Hash,
    /// Author name and email
    Author,
    /// Author date
    Date,
    /// A line of the commit message
    Message,
    /// A per file change record
    FileChange,
    /// Files changed / insertions / deletions totals
    Summary,
    /// Merge parents
    Merge,
    /// More than one rule fired; holds every rule that did.
    Ambiguous(Vec<Rule>),
    /// No rule fired.
    Unrecognized,
}

impl From<Rule> for LineTag {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Hash => LineTag::Hash,
            Rule::Author => LineTag::Author,
            Rule::Date => LineTag::Date,
            Rule::Message => LineTag::Message,
            Rule::FileChange => LineTag::FileChange,
            Rule::Summary => LineTag::Summary,
            Rule::Merge => LineTag::Merge,
        }
    }
}

fn is_single_indented(line: &str) -> bool {
    return line.starts_with(' ') && !line.starts_with(MESSAGE_INDENT);
}

// `:100644 100644 ...`: the mode field right after the colon is numeric.
fn is_raw_change(line: &str) -> bool {
    if !line.starts_with(':') {
        return false;
    }
    let mode_field = line.chars().skip(1).take(7).collect::<String>();
    return mode_field.trim().parse::<i64>().is_ok();
}

/// Checks every rule against the line, without stopping at the first match.
/// ```
/// # use git_netlog::classify::{matching_rules, Rule};
/// assert_eq!(matching_rules("Author: Jane <jane@example.com>"), vec![Rule::Author]);
/// assert!(matching_rules("random text").is_empty());
/// ```
pub fn matching_rules(line: &str) -> Vec<Rule> {
    let mut matches = Vec::new();

    if line.starts_with("commit ") && line.len() == HASH_LINE_LEN {
        matches.push(Rule::Hash);
    }
    if line.starts_with("Author:") {
        matches.push(Rule::Author);
    }
    if line.starts_with("Date:") {
        matches.push(Rule::Date);
    }
    if line.starts_with(MESSAGE_INDENT) {
        matches.push(Rule::Message);
    }
    if (is_single_indented(line) && line.contains('|')) || is_raw_change(line) {
        matches.push(Rule::FileChange);
    }
    if is_single_indented(line)
        && ((line.contains("insertion") && line.contains("(+)"))
            || (line.contains("deletion") && line.contains("(-)")))
    {
        matches.push(Rule::Summary);
    }
    if line.starts_with("Merge:") {
        matches.push(Rule::Merge);
    }

    return matches;
}

/// Identifies one line of `git log` output.
///
/// Never fails: a line matching nothing is [`LineTag::Unrecognized`], a line
/// matching several rules is [`LineTag::Ambiguous`]. Both cases are logged as
/// warnings.
/// ```
/// # use git_netlog::classify::{classify, LineTag};
/// assert_eq!(classify("commit 5be676481b4051af62f21eb2c8601b3f6bafb195"), LineTag::Hash);
/// assert_eq!(classify(" __init__.py | 2 ++"), LineTag::FileChange);
/// assert_eq!(classify("    Fix the parser"), LineTag::Message);
/// ```
pub fn classify(line: &str) -> LineTag {
    let mut rules = matching_rules(line);

    match rules.len() {
        0 => {
            warn!("<{}> did not match any input patterns during parsing.", line);
            return LineTag::Unrecognized;
        },
        1 => return rules.remove(0).into(),
        _ => {
            warn!(
                "<{}> matched multiple input patterns ({}) during parsing.",
                line,
                rules.iter().map(|r| r.to_string()).collect::<Vec<String>>().join(", "),
            );
            return LineTag::Ambiguous(rules);
        },
    }
}
