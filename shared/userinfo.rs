use crate::auth::extract_bearer_token;
use crate::config::{ConfigError, UserinfoConfig};
use crate::discord::{DiscordClient, UserProfile};
use crate::error::UserinfoError;
use anyhow::Context;
use serde::Serialize;
use vercel_runtime::{Body, Request, Response};

/// User object handed back to the frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserinfoResponse {
    pub id: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub roles: Vec<String>,
}

impl UserinfoResponse {
    pub fn new(profile: UserProfile, roles: Vec<String>) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            avatar: profile.avatar,
            roles,
        }
    }
}

/// Serve one userinfo request.
///
/// `config` is the result of loading configuration for this invocation; a
/// load failure is answered with a 500 before the request is inspected.
pub async fn handle(req: &Request, config: Result<UserinfoConfig, ConfigError>) -> Response<Body> {
    tracing::info!("Userinfo function processed a request.");

    let result = match config {
        Ok(config) => resolve_userinfo(req, &config).await,
        Err(e) => Err(UserinfoError::Config(e)),
    };

    match result.and_then(|user_info| json_response(&user_info)) {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Run the pipeline: token, profile (mandatory), roles (best effort)
pub async fn resolve_userinfo(
    req: &Request,
    config: &UserinfoConfig,
) -> Result<UserinfoResponse, UserinfoError> {
    let token = extract_bearer_token(req).map_err(UserinfoError::MissingToken)?;
    tracing::info!("Successfully extracted token (first 5 chars): {}", token.log_prefix());

    let client = DiscordClient::new(config).context("building Discord HTTP client")?;

    let profile = client.fetch_current_user(&token).await?;
    tracing::info!(
        "Fetched basic info for user: {} ({})",
        profile.username.as_deref().unwrap_or("<unknown>"),
        profile.id.as_deref().unwrap_or("<unknown>")
    );

    let roles = client
        .fetch_member_roles(&token, &config.required_guild_id)
        .await;

    Ok(UserinfoResponse::new(profile, roles))
}

fn json_response(user_info: &UserinfoResponse) -> Result<Response<Body>, UserinfoError> {
    let body = serde_json::to_string(user_info).context("serializing userinfo response")?;

    let response = Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(body.into())
        .context("building userinfo response")?;

    Ok(response)
}
