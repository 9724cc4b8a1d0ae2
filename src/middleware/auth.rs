use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, Actor};
use crate::error::ApiError;

/// Resolve the caller from a Bearer token or the session cookie and make the
/// `Actor` available to handlers through request extensions
pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let security = &state.config.security;

    let token = extract_token(request.headers(), &security.session_cookie).ok_or_else(|| {
        tracing::debug!("Rejected {}: no credentials", request.uri().path());
        ApiError::unauthorized()
    })?;

    let claims = validate_jwt(&token, &security.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(Actor::from(claims));
    Ok(next.run(request).await)
}

/// `Authorization: Bearer <jwt>` wins over the session cookie
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(auth) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
