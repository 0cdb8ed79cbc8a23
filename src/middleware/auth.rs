use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::errors::{AppError, Result};
use crate::models::user::{Claims, Role};
use crate::state::AppState;

pub const CANDIDATE_ONLY: &[Role] = &[Role::Candidate];
pub const HR_ONLY: &[Role] = &[Role::Hr];
pub const STAFF: &[Role] = &[Role::Hr, Role::Department];

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verifies the bearer token and puts its claims into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::unauthorized("No token provided"))?;

    let claims = state.tokens.verify(token)?;

    // Insert claims into request extensions
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Lets the request through only if the token's role is in `allowed`.
/// Must be layered inside [`auth_middleware`].
pub async fn require_roles(allowed: &'static [Role], request: Request, next: Next) -> Result<Response> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::unauthorized("No token provided"))?;

    if !allowed.contains(&claims.role) {
        tracing::warn!(
            user_id = %claims.id,
            role = %claims.role,
            path = %request.uri().path(),
            "Access denied"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// Claims of the authenticated caller, for handlers behind [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("No token provided"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }
}
