//! Jira integration for the ticket-comment hook
//!
//! This module provides:
//! - Extraction of ticket references (`PROJ-123`) from commit messages
//! - The [`TicketApi`] seam used to log in and post comments
//! - [`XmlRpcClient`], the `jira1` XML-RPC implementation of that seam

use std::fmt;

use regex::Regex;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Error, Result};
use crate::xmlrpc::{self, Response};

/// A ticket key found in a commit message (e.g., "PROJA-123")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketReference(String);

impl TicketReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketReference {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Finds references to tickets of a fixed set of projects
#[derive(Debug, Clone)]
pub struct TicketMatcher {
    pattern: Option<Regex>,
}

impl TicketMatcher {
    /// Build a matcher for the given project keys
    ///
    /// An empty project list produces a matcher that never matches.
    pub fn new<S: AsRef<str>>(projects: &[S]) -> Result<Self> {
        if projects.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternatives: Vec<String> = projects
            .iter()
            .map(|p| regex::escape(p.as_ref()))
            .collect();
        let pattern = format!(r"\b((?:{})-[0-9]+)\b", alternatives.join("|"));
        let regex = Regex::new(&pattern)
            .map_err(|e| Error::Config(format!("invalid project pattern: {}", e)))?;

        Ok(Self {
            pattern: Some(regex),
        })
    }

    /// All ticket references in `message`, in order, duplicates included
    pub fn find_all(&self, message: &str) -> Vec<TicketReference> {
        match &self.pattern {
            Some(pattern) => pattern
                .captures_iter(message)
                .map(|caps| TicketReference::from(&caps[1]))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Session credential returned by a successful login
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Remote operations the hook needs from the ticket tracker
pub trait TicketApi {
    fn login(&self, user: &str, password: &str) -> Result<AuthToken>;

    fn add_comment(&self, token: &AuthToken, ticket: &TicketReference, comment: &str)
        -> Result<()>;
}

/// Jira's `jira1` XML-RPC interface
pub struct XmlRpcClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

impl XmlRpcClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("mo-tools/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    fn call(&self, method: &str, params: &[&str]) -> Result<String> {
        log::debug!("calling {} at {}", method, self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(xmlrpc::method_call(method, params))
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(Error::RemoteApi {
                method: method.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        match xmlrpc::parse_response(&body) {
            Some(Response::Value(value)) => Ok(value),
            Some(Response::Fault(message)) => Err(Error::RemoteApi {
                method: method.to_string(),
                message,
            }),
            None => Err(Error::RemoteApi {
                method: method.to_string(),
                message: "malformed XML-RPC response".to_string(),
            }),
        }
    }
}

impl TicketApi for XmlRpcClient {
    fn login(&self, user: &str, password: &str) -> Result<AuthToken> {
        self.call("jira1.login", &[user, password]).map(AuthToken)
    }

    fn add_comment(
        &self,
        token: &AuthToken,
        ticket: &TicketReference,
        comment: &str,
    ) -> Result<()> {
        self.call(
            "jira1.addComment",
            &[token.as_str(), ticket.as_str(), comment],
        )?;
        Ok(())
    }
}
