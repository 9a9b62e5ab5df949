//! Minimal Discord REST client for the two calls the userinfo function makes.

use crate::auth::BearerToken;
use crate::config::UserinfoConfig;
use crate::error::UpstreamError;
use reqwest::StatusCode;
use serde::de::Error as _;
use serde::Deserialize;
use url::Url;

const USER_AGENT: &str = concat!(
    "DiscordBot (guild-userinfo-serverless, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Subset of the Discord user object returned by `GET /users/@me`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// Only a JSON object is a user; arrays would otherwise bind positionally.
    pub fn from_body(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !body.is_object() {
            return Err(serde_json::Error::custom(
                "expected the Discord user object to be a JSON object",
            ));
        }
        serde_json::from_value(body)
    }
}

/// Roles taken from the guild member object returned by
/// `GET /users/@me/guilds/{guild.id}/member`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipInfo {
    pub roles: Vec<String>,
}

impl MembershipInfo {
    /// Interpret a member body; anything other than an object whose `roles`
    /// is an array of strings counts as no roles.
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        let roles = body.get("roles")?;
        serde_json::from_value::<Vec<String>>(roles.clone())
            .ok()
            .map(|roles| Self { roles })
    }
}

/// Read a success body in full and parse it as JSON. A read that fails
/// part way is a transport failure, not a decode failure.
async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, UpstreamError> {
    let bytes = response.bytes().await.map_err(UpstreamError::Unreachable)?;
    serde_json::from_slice(&bytes).map_err(UpstreamError::Decode)
}

/// HTTP client bound to one Discord API root
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: Url,
}

impl DiscordClient {
    pub fn new(config: &UserinfoConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_base: config.discord_api_base.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_base.join(path)
    }

    /// Fetch the token owner's profile. This call is mandatory for the
    /// pipeline, so every failure is reported to the caller.
    pub async fn fetch_current_user(&self, token: &BearerToken) -> Result<UserProfile, UpstreamError> {
        let url = self.endpoint("users/@me")?;

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, token.authorization_value())
            .send()
            .await
            .map_err(UpstreamError::Unreachable)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Discord API returned 401 for user info: {}", body);
            return Err(UpstreamError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Discord user info request failed with status {}: {}", status, body);
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = read_json(response).await?;
        UserProfile::from_body(body).map_err(UpstreamError::Decode)
    }

    /// Fetch the token owner's member record in `guild_id`
    pub async fn fetch_guild_member(
        &self,
        token: &BearerToken,
        guild_id: &str,
    ) -> Result<serde_json::Value, UpstreamError> {
        let path = format!("users/@me/guilds/{}/member", urlencoding::encode(guild_id));
        let url = self.endpoint(&path)?;

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, token.authorization_value())
            .send()
            .await
            .map_err(UpstreamError::Unreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                "Failed to fetch member info (Status: {}): {}",
                status.as_u16(),
                body
            );
            return Err(if status == StatusCode::UNAUTHORIZED {
                UpstreamError::Unauthorized
            } else {
                UpstreamError::Status(status.as_u16())
            });
        }

        read_json(response).await
    }

    /// Roles held in `guild_id`, degrading to an empty list on any failure.
    /// The user may have left the guild, so this never aborts the request.
    pub async fn fetch_member_roles(&self, token: &BearerToken, guild_id: &str) -> Vec<String> {
        tracing::info!("Fetching member info for guild {}", guild_id);

        let body = match self.fetch_guild_member(token, guild_id).await {
            Ok(body) => body,
            // Already logged with the upstream body
            Err(UpstreamError::Status(_) | UpstreamError::Unauthorized) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Member info unavailable, continuing without roles: {}", e);
                return Vec::new();
            }
        };

        match MembershipInfo::from_body(&body) {
            Some(member) => {
                tracing::info!("Fetched roles for user: {}", member.roles.join(", "));
                member.roles
            }
            None => {
                tracing::warn!("Could not parse roles from member data: {}", body);
                Vec::new()
            }
        }
    }
}
