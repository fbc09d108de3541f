//! Jira comment template
//!
//! Comments use Jira wiki markup: a tinted panel holding a linked commit
//! header followed by the commit message.

/// Values substituted into the comment template
#[derive(Debug, Clone, Default)]
pub struct CommentContext<'a> {
    /// Repository name (without `.git`)
    pub repo: &'a str,
    /// Abbreviated commit hash
    pub sha: &'a str,
    pub branch: &'a str,
    pub author: &'a str,
    pub message: &'a str,
    /// Base URL of the repository browser
    pub web_url: &'a str,
}

/// Render the comment posted to each referenced ticket
pub fn render_comment(ctx: &CommentContext) -> String {
    let web = ctx.web_url.trim_end_matches('/');

    format!(
        "\n{{panel:borderColor=#ccc|borderStyle=solid|bgColor=#d3e1fe}}\n\
         *[{repo} commit {sha}|{web}/{repo}/commit/{sha}]* \
         *(**[branch {branch}|{web}/{repo}/commits/{branch}]**, by {author})*\n\
         \n\
         {message}\n\
         {{panel}}\n",
        repo = ctx.repo,
        sha = ctx.sha,
        web = web,
        branch = ctx.branch,
        author = ctx.author,
        message = ctx.message.trim_end(),
    )
}
