use config::Config;
use handlers::auth::configure_cors;
use repositories::PostgresRepo;
use routes::create_routes;
use services::{auth::AuthService, posts::PostsService, user::UserService};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{env, sync::Arc};

pub use self::errors::{Error, Result};

mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub auth_service: AuthService,
    pub posts_service: PostsService,
    pub users_service: UserService,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        tracing::error!("Failed to run migrations: {:?}", err);
        std::process::exit(1);
    }

    let repo = PostgresRepo::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        config: config.clone(),
        auth_service: AuthService::new(repo.clone(), config.jwt_secret.clone(), config.jwt_maxage),
        posts_service: PostsService::new(repo.clone()),
        users_service: UserService::new(repo, config.jwt_secret.clone()),
    };

    let app = create_routes(Arc::new(app_state)).layer(configure_cors());

    let listener = tokio::net::TcpListener::bind(format!(
        "[::]:{}",
        env::var("PORT").unwrap_or_else(|_| "8080".to_string())
    ))
    .await
    .unwrap();
    axum::serve(listener, app).await.unwrap();
}
