use crate::auth::TokenRejection;
use crate::config::ConfigError;
use thiserror::Error;
use vercel_runtime::{Body, Response};

pub const CONFIG_ERROR_MESSAGE: &str = "Server configuration error.";
pub const MISSING_TOKEN_MESSAGE: &str = "Unauthorized: Missing token.";
pub const INVALID_TOKEN_MESSAGE: &str = "Unauthorized: Invalid or expired token.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to retrieve user information from Discord.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

/// Outcome of a failed call to the Discord API
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Discord rejected the access token
    #[error("Discord rejected the access token (401)")]
    Unauthorized,
    /// Any other non-success status
    #[error("Discord responded with status {0}")]
    Status(u16),
    /// Connection failure or timeout
    #[error("Discord request failed: {0}")]
    Unreachable(#[source] reqwest::Error),
    /// Success status but the body is not the expected JSON
    #[error("Discord response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("could not build Discord endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Every way the userinfo pipeline can stop short of a 200
#[derive(Debug, Error)]
pub enum UserinfoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("missing bearer token ({0:?})")]
    MissingToken(TokenRejection),
    #[error("profile request failed: {0}")]
    Upstream(UpstreamError),
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<UpstreamError> for UserinfoError {
    fn from(err: UpstreamError) -> Self {
        match err {
            // A profile body we cannot read is not a gateway problem
            UpstreamError::Decode(source) => {
                Self::Internal(anyhow::Error::new(source).context("decoding Discord user profile"))
            }
            UpstreamError::Endpoint(source) => {
                Self::Internal(anyhow::Error::new(source).context("building Discord endpoint URL"))
            }
            other => Self::Upstream(other),
        }
    }
}

impl UserinfoError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Config(_) => 500,
            Self::MissingToken(_) => 401,
            Self::Upstream(UpstreamError::Unauthorized) => 401,
            Self::Upstream(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Body text returned to the caller; never includes internal detail
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Config(_) => CONFIG_ERROR_MESSAGE,
            Self::MissingToken(_) => MISSING_TOKEN_MESSAGE,
            Self::Upstream(UpstreamError::Unauthorized) => INVALID_TOKEN_MESSAGE,
            Self::Upstream(_) => UPSTREAM_FAILURE_MESSAGE,
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    pub fn into_response(self) -> Response<Body> {
        match &self {
            Self::MissingToken(_) => tracing::warn!("Rejecting request: {}", self),
            Self::Upstream(UpstreamError::Unauthorized) => tracing::warn!("Rejecting request: {}", self),
            _ => tracing::error!("Userinfo request failed: {}", self),
        }

        text_response(self.status(), self.public_message())
    }
}

/// Build a plain-text response, adding a bearer challenge to 401s
pub fn text_response(status: u16, message: &'static str) -> Response<Body> {
    let mut builder = Response::builder()
        .status(status)
        .header("content-type", "text/plain; charset=utf-8");
    if status == 401 {
        builder = builder.header("WWW-Authenticate", "Bearer");
    }

    builder.body(message.into()).unwrap_or_else(|_| {
        let mut fallback = Response::new(Body::from(INTERNAL_ERROR_MESSAGE));
        *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
