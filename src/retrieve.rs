use std::path::Path;
use std::process::{Command, ExitStatus};

use log::{debug, info, warn};

use crate::assemble::MODE_SIGNATURE;
use crate::error::GitnetError;
use crate::mode::LogMode;

/// Runs `git log` in `path` and returns its output behind the two line
/// `Mode =` header that [`crate::parse_commits`] expects.
///
/// The working directory of the git process is set, the current process'
/// directory is never touched.
pub fn retrieve_commits(path: &Path, mode: LogMode) -> Result<String, GitnetError> {
    info!("Attempting local git log retrieval from {:?}...", path);

    let output = Command::new("git")
        .current_dir(path)
        .args(mode.git_args())
        .output()?;
    debug!("git {} exited with {}", mode.git_args().join(" "), output.status);

    let raw_logs = String::from_utf8(output.stdout)?;
    if raw_logs.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(empty_log_error(path, output.status, stderr.trim()));
    }

    info!("Got {} characters from: {:?}", raw_logs.len(), path);
    return Ok(with_header(&raw_logs, mode));
}

/// Prefixes raw `git log` output with the mode header.
/// ```
/// # use git_netlog::{retrieve::with_header, LogMode};
/// assert_eq!(with_header("commit ...\n", LogMode::Raw), "Mode =\nraw\ncommit ...\n");
/// ```
pub fn with_header(raw_logs: &str, mode: LogMode) -> String {
    return format!("{}\n{}\n{}", MODE_SIGNATURE, mode, raw_logs);
}

fn git_succeeds(path: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").current_dir(path).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    return Some(String::from_utf8_lossy(&out.stdout).trim().to_owned());
}

// Tells an empty work tree apart from a directory git doesn't know and from
// any other git failure.
fn empty_log_error(path: &Path, status: ExitStatus, stderr: &str) -> GitnetError {
    let inside_work_tree = git_succeeds(path, &["rev-parse", "--is-inside-work-tree"])
        .map(|out| out == "true");

    match inside_work_tree {
        Some(true) if git_succeeds(path, &["rev-parse", "--verify", "--quiet", "HEAD"]).is_none() => {
            return GitnetError::Repository(format!("{} has no commits.", path.display()));
        },
        None => {
            return GitnetError::Repository(format!("{} is not a Git repository.", path.display()));
        },
        _ => {},
    }

    warn!("git log in {:?} printed nothing ({}): {}", path, status, stderr);
    if stderr.is_empty() {
        return GitnetError::Repository(format!("git log failed in {} ({}).", path.display(), status));
    }
    return GitnetError::Repository(format!("git log failed in {}: {}", path.display(), stderr));
}
