use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware::from_fn,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    middleware::{auth, maybe_auth, AuthUser, MaybeUser},
    models::{
        comments::CommentDto,
        pagination::PageQueryDto,
        posts::{CreatePostDto, UpdatePostDto},
    },
    AppState, Result,
};

fn post_detail_path(post_id: Uuid) -> String {
    format!("/posts/{}/", post_id)
}

fn profile_path(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

/// Public listing and detail pages. The viewer may be anonymous.
pub fn blog_handler() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/category/{slug}/", get(category_posts))
        .route("/posts/{id}/", get(post_detail))
        .layer(from_fn(maybe_auth))
}

/// Post and comment mutations; every route requires a login.
pub fn posts_handler() -> Router {
    Router::new()
        .route("/posts/create/", get(create_post_form).post(create_post))
        .route("/posts/{id}/edit/", get(edit_post_form).post(edit_post))
        .route(
            "/posts/{id}/delete/",
            get(delete_post_form).post(delete_post),
        )
        .route("/posts/{id}/comment/", post(add_comment))
        .route(
            "/posts/{id}/comment/{cid}/edit/",
            get(edit_comment_form).post(edit_comment),
        )
        .route(
            "/posts/{id}/comment/{cid}/delete/",
            get(delete_comment_form).post(delete_comment),
        )
        .layer(from_fn(auth))
}

async fn index(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<PageQueryDto>,
) -> Result<impl IntoResponse> {
    let page = app_state
        .posts_service
        .home_page(query.page.as_deref())
        .await?;

    Ok(Json(page))
}

async fn category_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<PageQueryDto>,
) -> Result<impl IntoResponse> {
    let (category, page) = app_state
        .posts_service
        .category_page(&slug, query.page.as_deref())
        .await?;

    Ok(Json(json!({ "category": category, "posts": page })))
}

async fn post_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(MaybeUser(viewer)): Extension<MaybeUser>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (post, comments) = app_state
        .posts_service
        .post_detail(post_id, viewer.map(|u| u.id))
        .await?;

    Ok(Json(json!({ "post": post, "comments": comments })))
}

async fn create_post_form(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let (categories, locations) = app_state.posts_service.form_choices().await?;

    Ok(Json(
        json!({ "categories": categories, "locations": locations }),
    ))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Json(new_post): Json<CreatePostDto>,
) -> Result<impl IntoResponse> {
    new_post.validate()?;

    let post = app_state.posts_service.create_post(user.id, new_post).await?;
    debug!(post_id = %post.id, author = %user.username, "post created");

    Ok(Redirect::to(&profile_path(&user.username)))
}

async fn edit_post_form(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let Some(post) = app_state.posts_service.post_for_edit(post_id, user.id).await? else {
        // Someone else's post: back to the detail page, no error surfaced.
        return Ok(Redirect::to(&post_detail_path(post_id)).into_response());
    };

    let (categories, locations) = app_state.posts_service.form_choices().await?;

    Ok(Json(json!({
        "post": post,
        "categories": categories,
        "locations": locations,
    }))
    .into_response())
}

async fn edit_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path(post_id): Path<Uuid>,
    Json(update): Json<UpdatePostDto>,
) -> Result<impl IntoResponse> {
    // Resolve and check ownership before looking at the payload: a missing
    // post is a 404 and a foreign post is the silent redirect, no matter
    // what the body contains.
    if app_state
        .posts_service
        .post_for_edit(post_id, user.id)
        .await?
        .is_none()
    {
        return Ok(Redirect::to(&post_detail_path(post_id)));
    }

    update.validate()?;

    app_state
        .posts_service
        .update_post(post_id, user.id, update)
        .await?;

    Ok(Redirect::to(&post_detail_path(post_id)))
}

async fn delete_post_form(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let post = app_state.posts_service.post_for_delete(post_id, user.id).await?;

    Ok(Json(json!({ "post": post })))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.posts_service.delete_post(post_id, user.id).await?;

    Ok(Redirect::to(&profile_path(&user.username)))
}

async fn add_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path(post_id): Path<Uuid>,
    Json(comment): Json<CommentDto>,
) -> Result<impl IntoResponse> {
    // The post must exist even when the comment is discarded.
    app_state.posts_service.require_post(post_id).await?;

    // Invalid comment text is swallowed: the client is sent back to the
    // detail page either way, with nothing persisted.
    if comment.validate().is_ok() {
        app_state
            .posts_service
            .add_comment(post_id, user.id, &comment.text)
            .await?;
    }

    Ok(Redirect::to(&post_detail_path(post_id)))
}

async fn edit_comment_form(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let Some(comment) = app_state
        .posts_service
        .comment_for_edit(post_id, comment_id, user.id)
        .await?
    else {
        return Ok(Redirect::to(&post_detail_path(post_id)).into_response());
    };

    Ok(Json(json!({ "comment": comment })).into_response())
}

async fn edit_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(comment): Json<CommentDto>,
) -> Result<impl IntoResponse> {
    // Same ordering as post edits: lookup, then ownership, then the payload.
    if app_state
        .posts_service
        .comment_for_edit(post_id, comment_id, user.id)
        .await?
        .is_none()
    {
        return Ok(Redirect::to(&post_detail_path(post_id)));
    }

    comment.validate()?;

    app_state
        .posts_service
        .update_comment(post_id, comment_id, user.id, &comment.text)
        .await?;

    Ok(Redirect::to(&post_detail_path(post_id)))
}

async fn delete_comment_form(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let comment = app_state
        .posts_service
        .comment_for_delete(post_id, comment_id, user.id)
        .await?;

    Ok(Json(json!({ "comment": comment })))
}

async fn delete_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(AuthUser { user }): Extension<AuthUser>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    app_state
        .posts_service
        .delete_comment(post_id, comment_id, user.id)
        .await?;

    Ok(Redirect::to(&post_detail_path(post_id)))
}
