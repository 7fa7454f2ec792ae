// --- File: crates/agendify_scheduling/src/auth.rs ---
//! Caller identity from gateway-injected headers.
//!
//! The engine runs behind a gateway that authenticates users and forwards
//! their identity as request headers. A request missing any part of that
//! identity is rejected before it reaches a handler.

use agendify_common::{CallerContext, Role};
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use std::str::FromStr;
use uuid::Uuid;

const USER_ID_HEADER: &str = "x-user-id";
const TENANT_ID_HEADER: &str = "x-tenant-id";
const ROLE_HEADER: &str = "x-user-role";

/// Extractor handing handlers the verified [`CallerContext`].
#[derive(Debug, Clone)]
pub struct Caller(pub CallerContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = Uuid::from_str(header_value(parts, USER_ID_HEADER)?)
            .map_err(|_| bad_header(USER_ID_HEADER))?;
        let tenant_id = Uuid::from_str(header_value(parts, TENANT_ID_HEADER)?)
            .map_err(|_| bad_header(TENANT_ID_HEADER))?;
        let role = Role::from_str(header_value(parts, ROLE_HEADER)?)
            .map_err(|_| bad_header(ROLE_HEADER))?;
        Ok(Caller(CallerContext::new(user_id, tenant_id, role)))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, (StatusCode, String)> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, format!("missing {name} header")))
}

fn bad_header(name: &str) -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, format!("invalid {name} header"))
}
