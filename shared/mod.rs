//! Shared logic for the guild userinfo serverless function
//!
//! The `/api/userinfo` Vercel function takes a Discord OAuth2 access token
//! from the `Authorization` header, looks up the token owner with the
//! Discord API, and returns their profile together with their roles in a
//! single configured guild.
//!
//! ## Pipeline
//!
//! 1. Load [`UserinfoConfig`] (`REQUIRED_GUILD_ID` is mandatory)
//! 2. Extract the bearer token
//! 3. `GET /users/@me` (a failure here ends the request)
//! 4. `GET /users/@me/guilds/{guild_id}/member` (a failure here yields no roles)
//! 5. Respond with `{id, username, avatar, roles}`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shared::{userinfo, UserinfoConfig};
//!
//! pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
//!     Ok(userinfo::handle(&req, UserinfoConfig::from_env()).await)
//! }
//! ```

pub mod auth;
pub mod config;
pub mod discord;
pub mod error;
pub mod logging;
pub mod userinfo;

// Re-export commonly used types and functions
pub use auth::{extract_bearer_token, parse_bearer_header, BearerToken, TokenRejection};
pub use config::{ConfigError, UserinfoConfig};
pub use discord::{DiscordClient, MembershipInfo, UserProfile};
pub use error::{UpstreamError, UserinfoError};
pub use userinfo::{handle, resolve_userinfo, UserinfoResponse};
