//! Error type for the Medium client.
//!
//! Failures come from three places and stay distinguishable: local parameter
//! checks ([`MediumError::Validation`]), the server's own error envelope
//! ([`MediumError::Remote`]) and everything between the two
//! ([`MediumError::Transport`], [`MediumError::Unexpected`]). Callers that
//! only want the flat `{message, code}` shape use [`MediumError::code`].

use inkstand_http::HttpError;
use reqwest::StatusCode;
use thiserror::Error;

/// Code carried by every error that did not come from the server.
pub const DEFAULT_ERROR_CODE: i64 = -1;

#[derive(Debug, Error)]
pub enum MediumError {
    /// A required parameter was missing or a value outside its closed set.
    #[error("{0}")]
    Validation(String),

    /// 4xx/5xx answered with the platform's `errors` envelope.
    #[error("{message}")]
    Remote {
        status: StatusCode,
        code: i64,
        message: String,
    },

    /// Network failure, timeout or an undecodable body.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// A response the client cannot interpret.
    #[error("{0}")]
    Unexpected(String),

    /// Pagination stopped after the configured number of pages.
    #[error("pagination stopped after {pages} pages without reaching the end of the stream")]
    PageLimit { pages: u32 },
}

impl MediumError {
    pub(crate) fn missing(parameter: &str) -> Self {
        MediumError::Validation(format!("Missing required parameter \"{parameter}\""))
    }

    /// Server error code for [`MediumError::Remote`], [`DEFAULT_ERROR_CODE`] otherwise.
    ///
    /// ```
    /// use inkstand_medium::{DEFAULT_ERROR_CODE, MediumError};
    ///
    /// let err = MediumError::Validation("Missing required parameter \"userId\"".into());
    /// assert_eq!(err.code(), DEFAULT_ERROR_CODE);
    /// ```
    pub fn code(&self) -> i64 {
        match self {
            MediumError::Remote { code, .. } => *code,
            _ => DEFAULT_ERROR_CODE,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, MediumError::Transport(HttpError::Timeout { .. }))
    }
}

pub type Result<T> = std::result::Result<T, MediumError>;
