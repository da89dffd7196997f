//! The credential-decoding boundary consumed during turn construction.
//!
//! Token verification itself lives outside this crate; callers inject an
//! implementation and the [`crate::request::User`] container stores
//! whatever it yields.

use crate::json::JsonObject;
use anyhow::Result;
use async_trait::async_trait;

/// Type tag preceding the token value in a bearer authorization header.
pub const BEARER_TYPE_TAG: &str = "Bearer ";

/// Decodes credentials carried in an authorization header.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthHeaderProcessor: Send + Sync {
    /// Validates a signed identity token against the given audience and
    /// returns its decoded claims. Fails when the token cannot be
    /// validated.
    async fn decode_identity(&self, token: &str, audience: &str) -> Result<JsonObject>;

    /// Extracts the raw token value from a bearer header, stripping the
    /// `"Bearer "` tag. Never fails; yields an empty string when the
    /// header carries no bearer token.
    fn extract_bearer_token(&self, header: &str) -> String {
        header
            .split_once(BEARER_TYPE_TAG)
            .map(|(_, token)| token.to_string())
            .unwrap_or_default()
    }
}
