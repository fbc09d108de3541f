use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::{Error, Result};

/// Render a source file as syntax-highlighted HTML
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct HighlightArgs {
    /// File to highlight; also used to pick the lexer
    #[clap(value_parser)]
    pub filename: PathBuf,

    /// Pass `-` to read the content from stdin instead of FILENAME
    #[clap(value_parser = ["-"])]
    pub stdin: Option<String>,
}

impl HighlightArgs {
    pub fn reads_stdin(&self) -> bool {
        self.stdin.is_some()
    }
}

/// Add commit info to the Jira tickets referenced by pushed commits
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[clap(author, version, about, long_about = None)]
pub struct HookArgs {
    /// Revision before the push
    #[clap(value_parser)]
    pub oldrev: String,

    /// Revision after the push
    #[clap(value_parser)]
    pub newrev: String,

    /// The updated ref, e.g. refs/heads/main
    #[clap(value_parser)]
    pub refname: String,
}

impl HookArgs {
    /// Parse hook arguments, turning argument errors into `Error::Usage`
    ///
    /// `--help` and `--version` still print and exit the process.
    pub fn parse_args<I, T>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Self::try_parse_from(argv) {
            Ok(args) => Ok(args),
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => Err(Error::Usage(format!(
                "incorrect arguments, expected OLDREV NEWREV REFNAME\n{}",
                err.render()
            ))),
        }
    }

    /// The branch name: last path segment of the ref
    pub fn branch(&self) -> &str {
        self.refname.rsplit('/').next().unwrap_or(&self.refname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_file_only() {
        let args = HighlightArgs::try_parse_from(["mo-highlight", "src/main.rs"]).unwrap();
        assert_eq!(args.filename, PathBuf::from("src/main.rs"));
        assert!(!args.reads_stdin());
    }

    #[test]
    fn test_highlight_stdin_marker() {
        let args = HighlightArgs::try_parse_from(["mo-highlight", "Makefile.py", "-"]).unwrap();
        assert!(args.reads_stdin());
    }

    #[test]
    fn test_highlight_rejects_other_second_argument() {
        assert!(HighlightArgs::try_parse_from(["mo-highlight", "a.py", "b.py"]).is_err());
        assert!(HighlightArgs::try_parse_from(["mo-highlight"]).is_err());
        assert!(HighlightArgs::try_parse_from(["mo-highlight", "a.py", "-", "x"]).is_err());
    }

    #[test]
    fn test_hook_args() {
        let args =
            HookArgs::parse_args(["post-receive", "1111111", "2222222", "refs/heads/feature/login"])
                .unwrap();
        assert_eq!(args.oldrev, "1111111");
        assert_eq!(args.newrev, "2222222");
        assert_eq!(args.branch(), "login");
    }

    #[test]
    fn test_hook_args_wrong_count_is_usage_error() {
        let result = HookArgs::parse_args(["post-receive", "1111111", "2222222"]);
        assert!(matches!(result, Err(Error::Usage(_))));

        let result = HookArgs::parse_args(["post-receive", "a", "b", "c", "d"]);
        assert!(matches!(result, Err(Error::Usage(_))));
    }
}
