//! Authenticated session against the ticket tracker
//!
//! A [`Session`] is created once per hook run and handed to every comment
//! call. It logs in on first use and reuses that token until the run ends.

use crate::error::{Error, Result};
use crate::jira::{AuthToken, TicketApi, TicketReference};

/// Account used to post comments
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    /// Parse a `USER:PASSWORD` string, splitting on the first colon
    pub fn parse(credentials: &str) -> Result<Self> {
        match credentials.split_once(':') {
            Some((user, password)) if !user.is_empty() => Ok(Self {
                user: user.to_string(),
                password: password.to_string(),
            }),
            _ => Err(Error::Config(
                "credentials must have the form USER:PASSWORD".into(),
            )),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

pub struct Session<'a, A: TicketApi> {
    api: &'a A,
    credentials: Credentials,
    token: Option<AuthToken>,
}

impl<'a, A: TicketApi> Session<'a, A> {
    pub fn new(api: &'a A, credentials: Credentials) -> Self {
        Self {
            api,
            credentials,
            token: None,
        }
    }

    /// The session token, logging in if this is the first call
    pub fn token(&mut self) -> Result<&AuthToken> {
        let token = match self.token.take() {
            Some(token) => token,
            None => {
                log::debug!("logging in as {}", self.credentials.user);
                self.api
                    .login(&self.credentials.user, &self.credentials.password)?
            }
        };
        Ok(&*self.token.insert(token))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn add_comment(&mut self, ticket: &TicketReference, comment: &str) -> Result<()> {
        let token = self.token()?.clone();
        self.api.add_comment(&token, ticket, comment)
    }
}
