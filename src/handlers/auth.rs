use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Json, Router,
};
use tower_cookies::Cookie;
use tower_http::cors::{Any, CorsLayer};
use validator::Validate;

use crate::{
    errors::LOGIN_PATH,
    models::{
        response::Response,
        users::{LoginUserDto, RegisterUserDto, UserLoginResponseDto},
    },
    AppState, Error, Result,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn registration_handler() -> Router {
    Router::new().route("/registration/", get(registration_form).post(register))
}

pub fn configure_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn registration_form() -> Result<impl IntoResponse> {
    Ok(Json(Response {
        status: "success",
        message: "Submit username, email, password and passwordConfirm to register.".to_string(),
    }))
}

async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_user): Json<RegisterUserDto>,
) -> Result<impl IntoResponse> {
    new_user.validate()?;

    app_state.auth_service.register(new_user).await?;

    Ok(Redirect::to(LOGIN_PATH))
}

async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(user): Json<LoginUserDto>,
) -> Result<impl IntoResponse> {
    user.validate()?;

    let token = app_state
        .auth_service
        .login(&user.username, &user.password)
        .await?;

    let cookie_duration = time::Duration::minutes(app_state.config.jwt_maxage);
    let cookie = Cookie::build(("token", &token))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token: token.clone(),
    });

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| Error::InternalServerError)?,
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

async fn logout() -> Result<impl IntoResponse> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| Error::InternalServerError)?,
    );

    let response = (
        StatusCode::OK,
        Json(Response {
            status: "success",
            message: "Logged out.".to_string(),
        }),
    );

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}
