use std::fmt;
use vercel_runtime::Request;

/// Prefix a valid `Authorization` header must start with
pub const BEARER_PREFIX: &str = "Bearer ";

/// Number of token characters that may appear in logs
const LOGGED_TOKEN_CHARS: usize = 5;

/// Discord OAuth2 access token presented by the caller
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Value for an outbound `Authorization` header
    pub fn authorization_value(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.0)
    }

    /// Short prefix safe to write to logs
    pub fn log_prefix(&self) -> String {
        let prefix: String = self.0.chars().take(LOGGED_TOKEN_CHARS).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&self.log_prefix()).finish()
    }
}

/// Why a request carried no usable bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    MissingHeader,
    NotUtf8,
    WrongScheme,
    EmptyToken,
}

/// Parse an `Authorization` header value.
///
/// The token is the second segment when the value is split on single
/// spaces, so `"Bearer  abc"` (two spaces) yields an empty token and is
/// rejected, while `"Bearer abc extra"` yields `abc`.
pub fn parse_bearer_header(value: &str) -> Result<BearerToken, TokenRejection> {
    let rest = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(TokenRejection::WrongScheme)?;

    match rest.split(' ').next() {
        Some(token) if !token.is_empty() => Ok(BearerToken(token.to_string())),
        _ => Err(TokenRejection::EmptyToken),
    }
}

/// Extract bearer token from request headers
pub fn extract_bearer_token(req: &Request) -> Result<BearerToken, TokenRejection> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(TokenRejection::MissingHeader)?;
    let value = header.to_str().map_err(|_| TokenRejection::NotUtf8)?;

    parse_bearer_header(value)
}
