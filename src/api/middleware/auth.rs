use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    api::state::AppState,
    error::{AppError, Result},
};

/// The authenticated identity, attached to request extensions once the
/// bearer token has been verified.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Rejects the request unless it carries a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = match authenticate(&state, request.headers()) {
        Ok(user) => user,
        Err(err) => {
            if let AppError::Unauthorized(reason) = &err {
                tracing::warn!(
                    target: "security",
                    uri = %request.uri(),
                    method = %request.method(),
                    "Rejected bearer token: {}",
                    reason
                );
            }
            return Err(err);
        }
    };

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Like [`require_auth`], but proceeds unauthenticated on any failure
/// instead of rejecting the request.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(user) = authenticate(&state, request.headers()) {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized(
                "Access denied. Invalid authorization header format.".to_string(),
            )
        })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Access denied. Invalid authorization header format.".to_string())
    })?;

    if token.is_empty() {
        return Err(AppError::Unauthorized(
            "Access denied. No token provided.".to_string(),
        ));
    }

    let claims = state.token_service.verify(token)?;
    let user_id = claims
        .subject()
        .ok_or_else(|| AppError::Unauthorized("Invalid token payload.".to_string()))?
        .to_string();

    Ok(AuthUser { user_id })
}
