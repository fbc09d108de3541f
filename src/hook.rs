use std::io::Write;
use std::path::Path;

use colored::Colorize;

use crate::cli::HookArgs;
use crate::config::HookConfig;
use crate::error::{Error, Result};
use crate::git::{self, CommitInfo};
use crate::jira::{TicketApi, TicketMatcher, XmlRpcClient};
use crate::session::{Credentials, Session};
use crate::template::{self, CommentContext};

/// Where the pushed commits live and which branch they were pushed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushContext {
    pub repo: String,
    pub branch: String,
}

impl PushContext {
    /// Derive the context from the repository directory and the pushed ref
    pub fn new(repo_dir: &Path, args: &HookArgs) -> Result<Self> {
        let dir_name = repo_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::Config(format!("cannot name repository at {}", repo_dir.display()))
            })?;

        Ok(Self {
            repo: repo_name(&dir_name).to_string(),
            branch: args.branch().to_string(),
        })
    }
}

/// Repository name from its directory name
fn repo_name(dir_name: &str) -> &str {
    dir_name.strip_suffix(".git").unwrap_or(dir_name)
}

/// Posts commit comments to the tickets they reference
pub struct Hook<'a, A: TicketApi> {
    config: &'a HookConfig,
    matcher: TicketMatcher,
    /// `None` in dry-run mode, which never talks to the tracker
    session: Option<Session<'a, A>>,
}

impl<'a, A: TicketApi> Hook<'a, A> {
    pub fn new(config: &'a HookConfig, api: &'a A) -> Result<Self> {
        let session = if config.dry_run {
            None
        } else {
            Some(Session::new(api, Credentials::parse(&config.credentials)?))
        };

        Ok(Self {
            config,
            matcher: TicketMatcher::new(config.projects.as_slice())?,
            session,
        })
    }

    /// Comment on every ticket referenced by `commits`
    ///
    /// Stops at the first failure. Returns the number of comments handled
    /// (posted, or only announced in dry-run mode).
    pub fn process<W: Write>(
        &mut self,
        ctx: &PushContext,
        commits: &[CommitInfo],
        out: &mut W,
    ) -> Result<usize> {
        let mut handled = 0;

        for commit in commits {
            let sha = commit.short_sha();
            let tickets = self.matcher.find_all(&commit.message);
            if tickets.is_empty() {
                log::debug!("commit {} references no tickets", sha);
                continue;
            }

            let comment = template::render_comment(&CommentContext {
                repo: &ctx.repo,
                sha,
                branch: &ctx.branch,
                author: &commit.author,
                message: &commit.message,
                web_url: &self.config.web_url,
            });

            for ticket in &tickets {
                writeln!(out, "\t{} {} (commit {})", ">".bright_green(), ticket, sha)?;

                match self.session.as_mut() {
                    Some(session) => session.add_comment(ticket, &comment)?,
                    None => log::info!("dry run, not commenting on {}", ticket),
                }
                handled += 1;
            }
        }

        Ok(handled)
    }
}

/// Exit status for any failed or interrupted run
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Make an interrupt end the process with [`FAILURE_EXIT_CODE`]
pub fn exit_on_interrupt() -> Result<()> {
    ctrlc::set_handler(|| std::process::exit(FAILURE_EXIT_CODE))?;
    Ok(())
}

/// Ticket-comment hook entry point
///
/// # Arguments
/// * `args` - The push notification (old revision, new revision, ref)
/// * `repo_dir` - The repository the hook runs in
/// * `config` - Hook configuration
pub fn run(args: &HookArgs, repo_dir: &Path, config: &HookConfig) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Adding commit info to referenced Jira tickets.")?;

    let ctx = PushContext::new(repo_dir, args)?;
    let log_text = git::log_range(&config.git, repo_dir, &args.oldrev, &args.newrev)?;
    let commits = git::parse_log(&log_text)?;
    log::debug!(
        "{} commit(s) pushed to {} on {}",
        commits.len(),
        ctx.branch,
        ctx.repo
    );

    let api = XmlRpcClient::new(config.rpc_endpoint())?;
    let mut hook = Hook::new(config, &api)?;
    let handled = hook.process(&ctx, &commits, &mut stdout)?;

    log::info!("handled {} ticket comment(s)", handled);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::RecordingApi;

    fn commit(sha: &str, message: &str) -> CommitInfo {
        CommitInfo {
            sha: sha.to_string(),
            message: message.to_string(),
            author: "Jane Doe".to_string(),
        }
    }

    fn push() -> PushContext {
        PushContext {
            repo: "widgets".into(),
            branch: "main".into(),
        }
    }

    fn commits() -> Vec<CommitInfo> {
        vec![
            commit("4f1c2a9e8b7d", "Fixes PROJA-42 and PROJB-7"),
            commit("0a1b2c3d4e5f", "Refactor, no ticket"),
            commit("1234567890ab", "Follow-up for PROJA-42, see PROJC-99"),
        ]
    }

    fn run_hook(config: &HookConfig, api: &RecordingApi) -> (usize, String) {
        let mut out = Vec::new();
        let mut hook = Hook::new(config, api).unwrap();
        let handled = hook.process(&push(), &commits(), &mut out).unwrap();
        (handled, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_repo_name_strips_git_suffix() {
        assert_eq!(repo_name("widgets.git"), "widgets");
        assert_eq!(repo_name("widgets"), "widgets");
    }

    #[test]
    fn test_push_context() {
        let args = HookArgs {
            oldrev: "a".into(),
            newrev: "b".into(),
            refname: "refs/heads/release/2.0".into(),
        };

        let ctx = PushContext::new(Path::new("/srv/git/widgets.git"), &args).unwrap();

        assert_eq!(ctx.repo, "widgets");
        assert_eq!(ctx.branch, "2.0");
    }

    #[test]
    fn test_comments_every_reference_with_one_login() {
        let config = HookConfig::default();
        let api = RecordingApi::default();

        let (handled, out) = run_hook(&config, &api);

        assert_eq!(handled, 3);
        assert_eq!(api.logins.get(), 1);

        let comments = api.comments.borrow();
        let tickets: Vec<&str> = comments.iter().map(|(_, t, _)| t.as_str()).collect();
        assert_eq!(tickets, vec!["PROJA-42", "PROJB-7", "PROJA-42"]);
        assert!(comments[0].2.contains("*[widgets commit 4f1c2a9|"));
        assert!(comments[2].2.contains("Follow-up for PROJA-42"));

        assert!(out.contains("PROJA-42 (commit 4f1c2a9)"));
        assert!(out.contains("PROJB-7 (commit 4f1c2a9)"));
        assert!(out.contains("PROJA-42 (commit 1234567)"));
        assert!(!out.contains("PROJC-99"));
    }

    #[test]
    fn test_dry_run_makes_no_calls_and_prints_same_lines() {
        let live_api = RecordingApi::default();
        let (_, live_out) = run_hook(&HookConfig::default(), &live_api);

        let dry_config = HookConfig {
            dry_run: true,
            ..HookConfig::default()
        };
        let dry_api = RecordingApi::default();
        let (handled, dry_out) = run_hook(&dry_config, &dry_api);

        assert_eq!(handled, 3);
        assert_eq!(dry_api.logins.get(), 0);
        assert!(dry_api.comments.borrow().is_empty());
        assert_eq!(dry_out, live_out);
    }

    #[test]
    fn test_no_references_means_no_login() {
        let config = HookConfig::default();
        let api = RecordingApi::default();
        let mut hook = Hook::new(&config, &api).unwrap();
        let mut out = Vec::new();

        let handled = hook
            .process(&push(), &[commit("abcdef0", "nothing here")], &mut out)
            .unwrap();

        assert_eq!(handled, 0);
        assert_eq!(api.logins.get(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_remote_failure_aborts_run() {
        let config = HookConfig::default();
        let api = RecordingApi {
            fail_login: true,
            ..RecordingApi::default()
        };
        let mut hook = Hook::new(&config, &api).unwrap();
        let mut out = Vec::new();

        let result = hook.process(&push(), &commits(), &mut out);

        assert!(matches!(result, Err(Error::RemoteApi { .. })));
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.lines().count(), 1);
    }

    #[test]
    fn test_bad_credentials_rejected_up_front() {
        let config = HookConfig {
            credentials: "no-colon".into(),
            ..HookConfig::default()
        };
        let api = RecordingApi::default();
        assert!(matches!(Hook::new(&config, &api), Err(Error::Config(_))));
    }

    #[test]
    fn test_dry_run_ignores_credentials() {
        let config = HookConfig {
            dry_run: true,
            credentials: "no-colon".into(),
            ..HookConfig::default()
        };
        let api = RecordingApi::default();

        let (handled, _) = run_hook(&config, &api);

        assert_eq!(handled, 3);
        assert_eq!(api.logins.get(), 0);
    }
}
