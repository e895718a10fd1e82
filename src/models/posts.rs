use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: bool,
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author, category and location, as served on the
/// detail page. `category_is_published` is None when the post has no category.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub category_id: Option<Uuid>,
    pub category_slug: Option<String>,
    pub category_is_published: Option<bool>,
    pub location_name: Option<String>,
    pub is_published: bool,
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl PostDetail {
    /// A post is publicly visible iff it is published, its publication date is
    /// not in the future, and its category (if any) is published.
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_published && self.pub_date <= now && self.category_is_published.unwrap_or(true)
    }

    /// The author always sees their own post, published or not.
    pub fn is_visible_to(&self, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
        viewer == Some(self.author_id) || self.is_publicly_visible(now)
    }
}

/// Listing row: the post plus its comment count, as shown on index, category
/// and profile pages.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct PostPreview {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub category_slug: Option<String>,
    pub location_name: Option<String>,
    pub is_published: bool,
    pub image_url: Option<String>,
    pub comment_count: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePostDto {
    #[validate(length(min = 1, max = 256, message = "Title must be 1 to 256 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
    /// Future dates are allowed and make a delayed publication.
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdatePostDto {
    #[validate(length(min = 1, max = 256, message = "Title must be 1 to 256 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: Option<bool>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn detail(
        is_published: bool,
        pub_date: DateTime<Utc>,
        category_is_published: Option<bool>,
    ) -> PostDetail {
        PostDetail {
            id: Uuid::now_v7(),
            title: "title".to_string(),
            text: "text".to_string(),
            pub_date,
            author_id: Uuid::now_v7(),
            author_username: "author".to_string(),
            category_id: category_is_published.map(|_| Uuid::now_v7()),
            category_slug: category_is_published.map(|_| "slug".to_string()),
            category_is_published,
            location_name: None,
            is_published,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn published_past_post_is_public() {
        let now = Utc::now();
        let post = detail(true, now - Duration::hours(1), Some(true));
        assert!(post.is_publicly_visible(now));
    }

    #[test]
    fn unpublished_post_is_hidden() {
        let now = Utc::now();
        let post = detail(false, now - Duration::hours(1), Some(true));
        assert!(!post.is_publicly_visible(now));
    }

    #[test]
    fn future_dated_post_is_hidden() {
        let now = Utc::now();
        let post = detail(true, now + Duration::hours(1), Some(true));
        assert!(!post.is_publicly_visible(now));
    }

    #[test]
    fn post_in_hidden_category_is_hidden() {
        let now = Utc::now();
        let post = detail(true, now - Duration::hours(1), Some(false));
        assert!(!post.is_publicly_visible(now));
    }

    #[test]
    fn uncategorized_post_is_public() {
        let now = Utc::now();
        let post = detail(true, now - Duration::hours(1), None);
        assert!(post.is_publicly_visible(now));
    }

    #[test]
    fn author_sees_hidden_post() {
        let now = Utc::now();
        let post = detail(false, now + Duration::hours(1), Some(false));
        assert!(post.is_visible_to(Some(post.author_id), now));
    }

    #[test]
    fn stranger_does_not_see_hidden_post() {
        let now = Utc::now();
        let post = detail(false, now - Duration::hours(1), Some(true));
        assert!(!post.is_visible_to(Some(Uuid::now_v7()), now));
        assert!(!post.is_visible_to(None, now));
    }
}
