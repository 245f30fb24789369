//! Identity token handling.
//!
//! Callers of the admin routes send `Authorization: Bearer <jwt>`. The token
//! is an HS256 JWT issued by the event platform; its groups claim is checked
//! against the configured admin groups to produce a [`Role`]. The basket core
//! only ever sees the resulting role.

use std::collections::HashSet;

use axum::http::{header, HeaderMap};
use basket_core::Role;
use jsonwebtoken::{decode, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};

/// JWT claims structure.
///
/// The groups claim name is deployment-specific, so everything besides
/// `sub` and `exp` is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user name)
    #[serde(default)]
    pub sub: String,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Group names listed under `claim`.
    ///
    /// Accepts a list of strings or a single string; anything else is no groups.
    pub fn groups(&self, claim: &str) -> Vec<String> {
        match self.extra.get(claim) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
            Some(Value::String(group)) => vec![group.clone()],
            _ => Vec::new(),
        }
    }
}

/// Returns the token of an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Admin when any of `groups` is an admin group.
pub fn role_for(groups: &[String], admin_groups: &HashSet<String>) -> Role {
    Role::from_admin_flag(groups.iter().any(|g| admin_groups.contains(g)))
}

/// Verifies identity tokens and derives roles from them.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    secret: Option<String>,
    groups_claim: String,
    admin_groups: HashSet<String>,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        TokenVerifier {
            secret: config.token_secret.clone(),
            groups_claim: config.groups_claim.clone(),
            admin_groups: config.admin_groups.iter().cloned().collect(),
        }
    }

    /// Validate and decode a token.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| ApiError::unauthorized("Identity tokens are not accepted"))?;

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!(error = %e, "Rejected identity token");
            ApiError::unauthorized(format!("Invalid token: {}", e))
        })?;

        Ok(token_data.claims)
    }

    /// Role of a verified caller.
    pub fn role(&self, claims: &Claims) -> Role {
        role_for(&claims.groups(&self.groups_claim), &self.admin_groups)
    }

    /// Role of the caller behind a request's bearer token.
    ///
    /// A missing or invalid token is an error, not [`Role::User`].
    pub fn role_from_headers(&self, headers: &HeaderMap) -> ApiResult<Role> {
        let token = extract_bearer_token(headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        let claims = self.verify(token)?;
        let role = self.role(&claims);
        debug!(sub = %claims.sub, ?role, "Identity token accepted");
        Ok(role)
    }
}
