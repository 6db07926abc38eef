use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GitnetError;

/// The `git log` flavours the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Plain `git log`
    Basic,
    /// `git log --raw`
    Raw,
    /// `git log --stat`
    #[default]
    Stat,
}

impl LogMode {
    /// Lists every mode, in the order they are documented.
    /// ```
    /// # use git_netlog::LogMode;
    /// let names = LogMode::iter().map(|m| m.to_string()).collect::<Vec<String>>();
    /// assert_eq!(names, ["basic", "raw", "stat"]);
    /// ```
    pub fn iter() -> impl Iterator<Item = LogMode> {
        return [LogMode::Basic, LogMode::Raw, LogMode::Stat].into_iter();
    }

    /// The arguments handed to `git` to retrieve a log in this mode.
    /// ```
    /// # use git_netlog::LogMode;
    /// assert_eq!(LogMode::Stat.git_args(), &["log", "--stat"]);
    /// assert_eq!(LogMode::Basic.git_args(), &["log"]);
    /// ```
    pub fn git_args(&self) -> &'static [&'static str] {
        match self {
            LogMode::Basic => &["log"],
            LogMode::Raw => &["log", "--raw"],
            LogMode::Stat => &["log", "--stat"],
        }
    }

    /// The name written on the second header line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogMode::Basic => "basic",
            LogMode::Raw => "raw",
            LogMode::Stat => "stat",
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_str());
    }
}

impl FromStr for LogMode {
    type Err = GitnetError;

    /// Only the exact lowercase names are accepted.
    /// ```
    /// # use git_netlog::LogMode;
    /// assert_eq!("raw".parse::<LogMode>().unwrap(), LogMode::Raw);
    /// assert!("Stat".parse::<LogMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(LogMode::Basic),
            "raw" => Ok(LogMode::Raw),
            "stat" => Ok(LogMode::Stat),
            other => Err(GitnetError::Input(format!(
                "{} is not a valid retrieval mode.",
                other
            ))),
        }
    }
}
