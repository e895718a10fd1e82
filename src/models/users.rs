use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(
        min = 3,
        max = 150,
        message = "Username must be between 3 and 150 characters"
    ))]
    pub username: String,
    #[validate(
        length(min = 3, max = 254, message = "Email must be between 3 and 254 characters"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(max = 150, message = "First name is too long"))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Last name is too long"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

/// Public face of a user, without the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_dto_accepts_matching_passwords() {
        let dto = RegisterUserDto {
            username: "blogger".to_string(),
            email: "blogger@example.com".to_string(),
            password: "s3cret!".to_string(),
            password_confirm: "s3cret!".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn register_dto_rejects_password_mismatch() {
        let dto = RegisterUserDto {
            username: "blogger".to_string(),
            email: "blogger@example.com".to_string(),
            password: "s3cret!".to_string(),
            password_confirm: "other!".to_string(),
            ..Default::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirm"));
    }

    #[test]
    fn register_dto_rejects_bad_email() {
        let dto = RegisterUserDto {
            username: "blogger".to_string(),
            email: "not-an-email".to_string(),
            password: "s3cret!".to_string(),
            password_confirm: "s3cret!".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
