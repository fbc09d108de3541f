use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("error ({status}) running '{command}'\n\n-- stdout:\n{stdout}\n-- stderr:\n{stderr}")]
    Command {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to execute '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected git log output: {0}")]
    LogFormat(String),

    #[error("{method} failed: {message}")]
    RemoteApi { method: String, message: String },

    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read '{path}'")]
    ReadInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Highlighting error: {0}")]
    Highlight(#[from] syntect::Error),

    #[error("Could not install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Coarse classification used for the operator-facing report headline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Command,
    RemoteApi,
    Other,
}

impl ErrorKind {
    pub fn headline(&self) -> &'static str {
        match self {
            ErrorKind::Usage => "usage error",
            ErrorKind::Command => "command failed",
            ErrorKind::RemoteApi => "remote API error",
            ErrorKind::Other => "error",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Usage(_) => ErrorKind::Usage,
            Error::Command { .. } | Error::Spawn { .. } | Error::LogFormat(_) => ErrorKind::Command,
            Error::RemoteApi { .. } | Error::Http(_) => ErrorKind::RemoteApi,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Render the administrator-facing diagnostic block printed when the hook fails
///
/// # Arguments
/// * `err` - The error that aborted the run
/// * `argv` - The command line the hook was invoked with
/// * `admin` - Who to report to; the report line is omitted when empty
pub fn report(err: &Error, argv: &[String], admin: &str) -> String {
    let mut lines = vec![
        "* * *".to_string(),
        format!("* {}", argv.join(" ")),
        "*".to_string(),
    ];

    let message = format!("{}: {}", err.kind().headline(), err);
    lines.extend(message.lines().map(|line| format!("* {}", line)));

    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        lines.push(format!("* caused by: {}", cause));
        source = cause.source();
    }

    if !admin.is_empty() {
        lines.push("*".to_string());
        lines.push(format!("* Please report this full error message to: {}", admin));
    }
    lines.push("* * *".to_string());

    lines.join("\n")
}
