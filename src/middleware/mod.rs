use std::sync::Arc;

use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};
use axum_extra::extract::CookieJar;

use crate::{models::users::User, AppState, Error, Result};

/// Current user on routes that require a login.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Viewer identity on public routes; `None` for anonymous visitors.
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<User>);

fn token_from_request(req: &Request) -> Option<String> {
    let cookies = CookieJar::from_headers(req.headers());

    cookies
        .get("token")
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|stripped| stripped.to_string())
                })
        })
}

async fn resolve_user(app_state: &AppState, token: String) -> Result<User> {
    let user_id = app_state.users_service.decode_token(token)?;
    app_state
        .users_service
        .get_user(user_id)
        .await
        .map_err(|_| Error::LoginRequired)
}

/// Requires a valid session; anything else is redirected into the login flow.
pub async fn auth(mut req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or(Error::InternalServerError)?;

    let token = token_from_request(&req).ok_or(Error::LoginRequired)?;
    let user = resolve_user(&app_state, token).await?;

    req.extensions_mut().insert(AuthUser { user });

    Ok(next.run(req).await)
}

/// Public routes still want to know who is looking, so the author of a hidden
/// post sees it. A missing or stale token is simply an anonymous viewer.
pub async fn maybe_auth(mut req: Request, next: Next) -> Result<impl IntoResponse> {
    let app_state = req
        .extensions()
        .get::<Arc<AppState>>()
        .cloned()
        .ok_or(Error::InternalServerError)?;

    let viewer = match token_from_request(&req) {
        Some(token) => resolve_user(&app_state, token).await.ok(),
        None => None,
    };

    req.extensions_mut().insert(MaybeUser(viewer));

    Ok(next.run(req).await)
}
