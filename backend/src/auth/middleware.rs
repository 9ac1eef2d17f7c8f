//! Middleware for protecting authenticated routes and handling authorization.
//!
//! `authenticate` turns a bearer token into [`Claims`] stored in the request
//! extensions; `authorize` and `admin_only` run after it and check the role.

use crate::api::common::{ApiError, error_response};
use crate::app::AppState;
use crate::database::models::Role;
use crate::utils::jwt::{Claims, TokenError, TokenKind, TokenService};
use axum::{
    extract::{Extension, Request},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Pulls the raw token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers.get(AUTHORIZATION).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Authorization header is missing. Please provide a valid token.",
        )
    })?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            error_response(
                StatusCode::UNAUTHORIZED,
                "Invalid authorization format. Use Bearer <token>",
            )
        })?
        .trim();

    if token.is_empty() {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Token is missing. Please provide a valid token.",
        ));
    }

    Ok(token)
}

/// Verifies a token and accepts only session tokens.
pub fn session_claims(tokens: &TokenService, token: &str) -> Result<Claims, TokenError> {
    let claims = tokens.verify(token)?;
    if claims.kind != TokenKind::Session {
        return Err(TokenError::Malformed);
    }
    Ok(claims)
}

/// JWT authentication middleware
pub async fn authenticate(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;

    let claims = session_claims(&state.tokens, token).map_err(|error| {
        tracing::debug!("Rejected bearer token: {}", error);
        error_response(StatusCode::GONE, error.to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Optional JWT authentication middleware (doesn't fail if no token)
pub async fn optional_authenticate(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = bearer_token(request.headers())
        .ok()
        .and_then(|token| session_claims(&state.tokens, token).ok());

    // Always insert the Option<Claims>, even if it's None
    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Lets the request through only when the authenticated role is in `allowed`.
pub async fn authorize(
    allowed: &[Role],
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Authentication required."))?;

    if !allowed.contains(&claims.role) {
        tracing::warn!(
            user_id = %claims.sub,
            role = %claims.role,
            "Role not permitted for {}",
            request.uri().path()
        );
        return Err(error_response(
            StatusCode::FORBIDDEN,
            "Insufficient permissions to access this resource.",
        ));
    }

    Ok(next.run(request).await)
}

/// Admin role authorization middleware
pub async fn admin_only(request: Request, next: Next) -> Result<Response, ApiError> {
    authorize(&Role::ADMINISTRATORS, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Account;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    fn rejection(value: Option<&str>) -> (StatusCode, String) {
        let headers = headers(value);
        let (status, body) = bearer_token(&headers).unwrap_err();
        (status, body.0.error.clone().unwrap())
    }

    fn account() -> Account {
        let now = Utc::now();
        Account {
            id: "6f1c8d1e-0000-4000-8000-000000000001".to_string(),
            email: "a@b.com".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password_hash: "hash".to_string(),
            verified: true,
            phone_number: None,
            bvn: None,
            health_plan: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_rejections() {
        let (status, message) = rejection(None);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(message.starts_with("Authorization header is missing"));

        let (status, message) = rejection(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid authorization format. Use Bearer <token>");

        let (_, message) = rejection(Some("Bearer    "));
        assert!(message.starts_with("Token is missing"));
    }

    #[test]
    fn test_session_claims_refuses_reset_tokens() {
        let tokens = TokenService::new("middleware-secret").unwrap();
        let account = account();

        let session = tokens.issue(&account).unwrap();
        assert_eq!(session_claims(&tokens, &session).unwrap().sub, account.id);

        let reset = tokens.issue_password_reset(&account).unwrap();
        assert_eq!(
            session_claims(&tokens, &reset).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_session_claims_reports_expiry() {
        let tokens = TokenService::new("middleware-secret").unwrap();
        let stale = tokens
            .issue_at(&account(), TokenKind::Session, Utc::now() - Duration::days(2))
            .unwrap();
        assert_eq!(
            session_claims(&tokens, &stale).unwrap_err(),
            TokenError::Expired
        );
    }
}
