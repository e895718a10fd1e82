use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{
        auth::{auth_handler, registration_handler},
        posts::{blog_handler, posts_handler},
        user::{profile_edit_handler, profile_handler},
    },
    AppState,
};

pub fn create_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .merge(blog_handler())
        .merge(posts_handler())
        .merge(profile_handler())
        .merge(profile_edit_handler())
        .merge(registration_handler())
        .nest("/auth", auth_handler())
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
