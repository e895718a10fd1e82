use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware::from_fn,
    response::{IntoResponse, Redirect},
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use validator::Validate;

use crate::{
    middleware::{auth, maybe_auth, AuthUser, MaybeUser},
    models::{
        pagination::PageQueryDto,
        users::{FilterUserDto, UpdateProfileDto},
    },
    AppState, Result,
};

pub fn profile_handler() -> Router {
    Router::new()
        .route("/profile/{username}/", get(profile))
        .layer(from_fn(maybe_auth))
}

pub fn profile_edit_handler() -> Router {
    Router::new()
        .route("/profile/edit/", get(edit_profile_form).post(edit_profile))
        .layer(from_fn(auth))
}

async fn profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(MaybeUser(viewer)): Extension<MaybeUser>,
    Path(username): Path<String>,
    Query(query): Query<PageQueryDto>,
) -> Result<impl IntoResponse> {
    let profile_user = app_state.users_service.get_user_by_username(&username).await?;

    let page = app_state
        .posts_service
        .profile_page(&profile_user, viewer.map(|u| u.id), query.page.as_deref())
        .await?;

    Ok(Json(json!({
        "profile": FilterUserDto::filter_user(&profile_user),
        "posts": page,
    })))
}

async fn edit_profile_form(
    Extension(AuthUser { user }): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    Ok(Json(FilterUserDto::filter_user(&user)))
}

async fn edit_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Json(update): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse> {
    update.validate()?;

    app_state.users_service.update_profile(&user, update).await?;

    Ok(Redirect::to(&format!(
        "/profile/{}/",
        urlencoding::encode(&user.username)
    )))
}
