//! # mo-tools
//!
//! Two small repository tools: a driver that renders source files as
//! syntax-highlighted HTML, and a git hook that comments pushed commits on the
//! Jira tickets they reference.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod highlight;
pub mod hook;
pub mod jira;
pub mod session;
pub mod template;
pub mod xmlrpc;

// Re-export commonly used types
pub use config::HookConfig;
pub use error::{Error, Result};
pub use git::CommitInfo;
pub use jira::{TicketApi, TicketReference};
