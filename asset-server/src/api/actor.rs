//! Actor extraction
//!
//! The optional `X-Actor` header names who performed a mutation; it is
//! recorded verbatim on the resulting audit entry.

use axum::extract::FromRequestParts;
use http::request::Parts;
use std::convert::Infallible;

pub const ACTOR_HEADER: &str = "x-actor";

/// Longest actor name kept; longer values are truncated
const MAX_ACTOR_LEN: usize = 128;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor(pub Option<String>);

impl Actor {
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().take(MAX_ACTOR_LEN).collect());
        Ok(Actor(actor))
    }
}
