use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::users::{RegisterUserDto, User},
    repositories::{auth_repo::AuthRepository, user_repo::UserRepository, PostgresRepo},
    Error, Result,
};

#[derive(Clone)]
pub struct AuthService {
    repo: PostgresRepo,
    jwt_secret: String,
    jwt_maxage: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

impl AuthService {
    pub fn new(repo: PostgresRepo, jwt_secret: String, jwt_maxage: i64) -> Self {
        Self {
            repo,
            jwt_secret,
            jwt_maxage,
        }
    }

    pub async fn register(&self, new_user: RegisterUserDto) -> Result<User> {
        if self
            .repo
            .find_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(Error::BadRequest("Username already exists".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)?
            .to_string();

        self.repo
            .create_user(
                &new_user.username,
                &new_user.email,
                &password_hash,
                &new_user.first_name,
                &new_user.last_name,
            )
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(Error::BadRequest("Invalid username or password".to_string()))?;

        let argon2 = Argon2::default();
        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|_| Error::InternalServerError)?;
        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| Error::BadRequest("Invalid username or password".to_string()))?;

        self.generate_token(user.id)
    }

    fn generate_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.jwt_maxage)).timestamp() as usize;
        let iat = now.timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|_| Error::InternalServerError)
    }
}
