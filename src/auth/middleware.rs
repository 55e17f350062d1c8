//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::auth::{
    jwt::{JwtHandler, TokenError},
    models::Claims,
};
use crate::error::json_error;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

/// Auth middleware that validates JWT tokens. Admitted requests carry their
/// `Claims` in the request extensions.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer(req.headers())?;

    let claims = jwt_handler.validate_token(token).map_err(|e| match e {
        TokenError::Expired => AuthError::TokenExpired,
        TokenError::Invalid => AuthError::InvalidToken,
        TokenError::Signing(e) => {
            error!("Unexpected signing error during validation: {}", e);
            AuthError::InvalidToken
        }
    })?;

    debug!(user = %claims.sub, role = %claims.role, "Request admitted");
    let user = AuthenticatedUser(claims.sub.clone());
    req.extensions_mut().insert(claims);

    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Subject of an admitted token, attached to the response so the request
/// log can name who made the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

/// Pull the token out of `Authorization: Bearer <token>`. The scheme name is
/// matched case-insensitively.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;

    let token = header
        .to_str()
        .ok()
        .and_then(|s| s.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Bearer"))
        .map(|(_, token)| token.trim())
        .ok_or(AuthError::InvalidToken)?;

    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token)
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

/// Auth error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenExpired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Token no proporcionado",
            AuthError::InvalidToken => "Token inválido",
            AuthError::TokenExpired => "Token expirado",
        };

        json_error(StatusCode::UNAUTHORIZED, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::HeaderValue, http::Request as HttpRequest};

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid_token = AuthError::InvalidToken.into_response();
        assert_eq!(invalid_token.status(), StatusCode::UNAUTHORIZED);

        let expired = AuthError::TokenExpired.into_response();
        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(AuthError::MissingToken));
        assert_eq!(
            extract_bearer(&headers_with("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            extract_bearer(&headers_with("Bearer ")),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(extract_bearer(&headers_with("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers_with("bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers_with("BEARER abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(
            extract_bearer(&headers_with("Bearerabc.def.ghi")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_extract_claims_from_request() {
        let mut req = HttpRequest::new(Body::empty());

        assert!(extract_claims(&req).is_none());

        let claims = Claims {
            id: 1,
            sub: "test@example.com".to_string(),
            role: "user".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        req.extensions_mut().insert(claims);

        let extracted = extract_claims(&req);
        assert!(extracted.is_some());
        assert_eq!(extracted.unwrap().sub, "test@example.com");
    }
}
