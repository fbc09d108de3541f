//! Commit enumeration for a pushed revision range
//!
//! Commits are listed with `git log --pretty=medium` and parsed into
//! [`CommitInfo`] records. Parsing is kept separate from running the command
//! so it can be exercised against fixed log text.

use std::path::Path;
use std::process::Command;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref COMMIT_HEADER: Regex = Regex::new(r"(?m)^commit ").unwrap();
    static ref EMAIL: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Number of hex characters used for abbreviated commit hashes
pub const SHORT_SHA_LEN: usize = 7;

/// One commit of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash
    pub sha: String,
    /// Commit message body, de-indented
    pub message: String,
    /// Author name without the email address
    pub author: String,
}

impl CommitInfo {
    pub fn short_sha(&self) -> &str {
        match self.sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((idx, _)) => &self.sha[..idx],
            None => &self.sha,
        }
    }
}

/// Run `git log` for `oldrev..newrev` (exclusive start, inclusive end)
///
/// # Arguments
/// * `git` - The git executable to run
/// * `repo_dir` - The repository to list commits from
/// * `oldrev` - Revision before the push
/// * `newrev` - Revision after the push
///
/// # Returns
/// The complete stdout of the log command
pub fn log_range(git: &str, repo_dir: &Path, oldrev: &str, newrev: &str) -> Result<String> {
    let range = format!("{}..{}", oldrev, newrev);
    let args = ["log", "--pretty=medium", range.as_str()];
    let command = format!("{} {}", git, args.join(" "));

    log::debug!("running {}", command);
    let output = Command::new(git)
        .args(args)
        .current_dir(repo_dir)
        .output()
        .map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => code.to_string(),
            None => "signal".to_string(),
        };
        return Err(Error::Command {
            command,
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `git log --pretty=medium` output into commit records, in log order
pub fn parse_log(text: &str) -> Result<Vec<CommitInfo>> {
    COMMIT_HEADER
        .split(text)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(parse_commit)
        .collect()
}

fn parse_commit(chunk: &str) -> Result<CommitInfo> {
    let mut lines = chunk.lines();

    // First line is the hash, possibly followed by decorations
    let sha = lines
        .next()
        .and_then(|line| line.split_whitespace().next())
        .ok_or_else(|| Error::LogFormat(format!("missing commit hash in {:?}", chunk)))?
        .to_string();

    let mut author = None;
    let mut message_lines = Vec::new();
    let mut in_headers = true;

    for line in lines {
        if in_headers {
            if line.is_empty() {
                in_headers = false;
            } else if let Some(value) = line.strip_prefix("Author:") {
                author = Some(EMAIL.replace_all(value, "").trim().to_string());
            }
            continue;
        }
        message_lines.push(line.strip_prefix("    ").unwrap_or(line));
    }

    let author =
        author.ok_or_else(|| Error::LogFormat(format!("commit {} has no Author header", sha)))?;

    let message = message_lines.join("\n").trim_end().to_string();

    Ok(CommitInfo {
        sha,
        message,
        author,
    })
}
