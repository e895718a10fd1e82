use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::{
    models::users::{UpdateProfileDto, User},
    repositories::{user_repo::UserRepository, PostgresRepo},
    Error, Result,
};

use super::auth::Claims;

#[derive(Clone)]
pub struct UserService {
    repo: PostgresRepo,
    jwt_secret: String,
}

impl UserService {
    pub fn new(repo: PostgresRepo, jwt_secret: String) -> Self {
        Self { repo, jwt_secret }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user = self.repo.find_by_id(user_id).await?;
        user.ok_or(Error::NotFound)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        let user = self.repo.find_by_username(username).await?;
        user.ok_or(Error::NotFound)
    }

    /// Profile edit always operates on the current user; there is no way to
    /// address someone else's account here.
    pub async fn update_profile(&self, user: &User, update: UpdateProfileDto) -> Result<User> {
        self.repo
            .update_profile(
                user.id,
                update.first_name.as_deref(),
                update.last_name.as_deref(),
                update.email.as_deref(),
            )
            .await
    }

    pub fn decode_token<T: Into<String>>(&self, token: T) -> Result<Uuid> {
        let decoded = decode::<Claims>(
            &token.into(),
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| Error::LoginRequired)?;

        Uuid::parse_str(&decoded.claims.sub).map_err(|_| Error::LoginRequired)
    }
}
