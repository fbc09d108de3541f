//! Configuration for the ticket-comment hook
//!
//! Every setting has a compiled-in default. A repository may override any of
//! them with a `jira-hook.yaml` file in the directory the hook runs in (the
//! bare repository itself when invoked by git).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the optional per-repository override file
pub const CONFIG_FILE_NAME: &str = "jira-hook.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookConfig {
    /// Log intended comments without calling the remote API
    pub dry_run: bool,
    /// The git executable used to enumerate pushed commits
    pub git: String,
    /// Base URL of the repository browser linked from comments
    pub web_url: String,
    /// Base URL of the Jira instance
    pub jira_url: String,
    /// `USER:PASSWORD` of the account posting comments
    pub credentials: String,
    /// Project keys whose tickets are recognized in commit messages
    pub projects: Vec<String>,
    /// Who to contact about hook failures
    pub admin: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            git: "git".to_string(),
            web_url: "https://mo.example.com".to_string(),
            jira_url: "https://jira.example.com/".to_string(),
            credentials: "BOTUSER:BOTPASSWORD".to_string(),
            projects: vec!["PROJA".to_string(), "PROJB".to_string()],
            admin: "your administrator".to_string(),
        }
    }
}

impl HookConfig {
    /// Load the configuration for a repository directory
    ///
    /// Returns the compiled-in defaults when `dir` has no override file.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        log::debug!("loading overrides from {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a YAML override document on top of the defaults
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.git.trim().is_empty() {
            return Err(Error::Config("git command must not be empty".into()));
        }
        if let Some(bad) = self
            .projects
            .iter()
            .find(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        {
            return Err(Error::Config(format!("invalid project key: {:?}", bad)));
        }
        Ok(())
    }

    /// The XML-RPC endpoint of the Jira instance
    pub fn rpc_endpoint(&self) -> String {
        format!("{}/rpc/xmlrpc", self.jira_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = HookConfig::default();
        assert!(!config.dry_run);
        assert_eq!(config.git, "git");
        assert_eq!(config.projects, vec!["PROJA", "PROJB"]);
        assert_eq!(config.rpc_endpoint(), "https://jira.example.com/rpc/xmlrpc");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = HookConfig::load(dir.path()).unwrap();
        assert_eq!(config, HookConfig::default());
    }

    #[test]
    fn test_load_partial_override() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "dry_run: true\nprojects: [CORE, WEB]\n",
        )
        .unwrap();

        let config = HookConfig::load(dir.path()).unwrap();

        assert!(config.dry_run);
        assert_eq!(config.projects, vec!["CORE", "WEB"]);
        assert_eq!(config.jira_url, HookConfig::default().jira_url);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = HookConfig::from_yaml("jira_uri: https://typo.example.com\n");
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn test_invalid_project_key_is_rejected() {
        let result = HookConfig::from_yaml("projects: [\"PRO|JA\"]\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rpc_endpoint_without_trailing_slash() {
        let config = HookConfig {
            jira_url: "https://issues.example.org".into(),
            ..HookConfig::default()
        };
        assert_eq!(config.rpc_endpoint(), "https://issues.example.org/rpc/xmlrpc");
    }
}
