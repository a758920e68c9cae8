//! Identity extraction and tier enforcement.
//!
//! The platform gateway terminates authentication and forwards the caller's
//! identity as headers alongside a shared bearer secret. This layer verifies
//! the secret, parses the identity and hands it to handlers via request
//! extensions. Role checks happen per handler, matching the two tiers the
//! API exposes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ApiError;
use crate::server::AppStateArc;

/// Forwarded caller identity, inserted into request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Identity {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role != Role::Admin {
            return Err(ApiError::forbidden("Admin access required"));
        }
        Ok(())
    }
}

/// Verify the shared secret and attach the forwarded identity.
///
/// An empty configured secret disables the token check (warned about at
/// startup); the identity headers are still required.
pub async fn authenticate(
    State(state): State<AppStateArc>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let secret = state.config.auth.shared_secret.as_str();
    if !secret.is_empty() {
        let token = bearer_token(&request)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        if !token_matches(&token, secret) {
            warn!("Rejected request with an invalid bearer token");
            return Err(ApiError::unauthorized("Invalid bearer token"));
        }
    }

    let identity = identity_from_headers(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing or invalid X-User-Id header"))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Parse "Bearer <token>" from the Authorization header.
fn bearer_token(request: &Request) -> Option<String> {
    let header = request.headers().get("authorization")?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

/// Byte comparison that does not short-circuit on the first mismatch.
fn token_matches(token: &str, secret: &str) -> bool {
    let (a, b) = (token.as_bytes(), secret.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn identity_from_headers(request: &Request) -> Option<Identity> {
    let user_id = request
        .headers()
        .get("x-user-id")?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;

    let role = match request
        .headers()
        .get("x-user-role")
        .and_then(|value| value.to_str().ok())
    {
        Some(role) if role.eq_ignore_ascii_case("admin") => Role::Admin,
        _ => Role::User,
    };

    Some(Identity { user_id, role })
}
