use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    models::{
        comments::{Comment, CommentWithAuthor},
        posts::{Post, PostDetail, PostPreview},
    },
    Result,
};

use super::PostgresRepo;

const PREVIEW_SELECT: &str = r#"
    SELECT p.id, p.title, p.text, p.pub_date, p.author_id,
           u.username AS author_username,
           c.slug AS category_slug,
           l.name AS location_name,
           p.is_published, p.image_url,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count,
           p.created_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

const POST_COLUMNS: &str =
    "id, title, text, pub_date, author_id, category_id, location_id, is_published, image_url, created_at";

// Public visibility: published, not future-dated, category absent or published.
const PUBLIC_WHERE: &str =
    "p.is_published AND p.pub_date <= NOW() AND (p.category_id IS NULL OR c.is_published)";

#[async_trait]
pub trait PostsRepository: Send + Sync {
    async fn count_public(&self) -> Result<i64>;
    async fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<PostPreview>>;

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64>;
    async fn list_in_category(
        &self,
        category_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostPreview>>;

    async fn count_by_author(&self, author_id: Uuid, public_only: bool) -> Result<i64>;
    async fn list_by_author(
        &self,
        author_id: Uuid,
        public_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostPreview>>;

    async fn get_post_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>>;
    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>>;
    async fn get_post_of_author(&self, post_id: Uuid, author_id: Uuid) -> Result<Option<Post>>;

    async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        text: &str,
        pub_date: Option<DateTime<Utc>>,
        category_id: Option<Uuid>,
        location_id: Option<Uuid>,
        is_published: Option<bool>,
        image_url: Option<&str>,
    ) -> Result<Post>;
    #[allow(clippy::too_many_arguments)]
    async fn update_post(
        &self,
        post_id: Uuid,
        title: Option<&str>,
        text: Option<&str>,
        pub_date: Option<DateTime<Utc>>,
        category_id: Option<Uuid>,
        location_id: Option<Uuid>,
        is_published: Option<bool>,
        image_url: Option<&str>,
    ) -> Result<Post>;
    async fn delete_post(&self, post_id: Uuid) -> Result<()>;

    async fn get_comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>>;
    async fn get_comment(&self, comment_id: Uuid, post_id: Uuid) -> Result<Option<Comment>>;
    async fn get_comment_of_author(
        &self,
        comment_id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>>;
    async fn create_comment(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment>;
    async fn update_comment(&self, comment_id: Uuid, text: &str) -> Result<Comment>;
    async fn delete_comment(&self, comment_id: Uuid) -> Result<()>;
}

#[async_trait]
impl PostsRepository for PostgresRepo {
    async fn count_public(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*)
            FROM posts p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE {PUBLIC_WHERE}
            "#
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_public(&self, limit: i64, offset: i64) -> Result<Vec<PostPreview>> {
        let posts = sqlx::query_as::<_, PostPreview>(&format!(
            r#"
            {PREVIEW_SELECT}
            WHERE {PUBLIC_WHERE}
            ORDER BY p.pub_date DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts p
            WHERE p.category_id = $1
              AND p.is_published
              AND p.pub_date <= NOW()
            "#,
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_in_category(
        &self,
        category_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostPreview>> {
        let posts = sqlx::query_as::<_, PostPreview>(&format!(
            r#"
            {PREVIEW_SELECT}
            WHERE p.category_id = $1
              AND p.is_published
              AND p.pub_date <= NOW()
            ORDER BY p.pub_date DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count_by_author(&self, author_id: Uuid, public_only: bool) -> Result<i64> {
        let sql = if public_only {
            format!(
                r#"
                SELECT COUNT(*)
                FROM posts p
                LEFT JOIN categories c ON c.id = p.category_id
                WHERE p.author_id = $1 AND {PUBLIC_WHERE}
                "#
            )
        } else {
            "SELECT COUNT(*) FROM posts p WHERE p.author_id = $1".to_string()
        };

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        public_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostPreview>> {
        let sql = if public_only {
            format!(
                r#"
                {PREVIEW_SELECT}
                WHERE p.author_id = $1 AND {PUBLIC_WHERE}
                ORDER BY p.pub_date DESC
                LIMIT $2 OFFSET $3
                "#
            )
        } else {
            format!(
                r#"
                {PREVIEW_SELECT}
                WHERE p.author_id = $1
                ORDER BY p.pub_date DESC
                LIMIT $2 OFFSET $3
                "#
            )
        };

        let posts = sqlx::query_as::<_, PostPreview>(&sql)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn get_post_detail(&self, post_id: Uuid) -> Result<Option<PostDetail>> {
        let post = sqlx::query_as::<_, PostDetail>(
            r#"
            SELECT p.id, p.title, p.text, p.pub_date, p.author_id,
                   u.username AS author_username,
                   p.category_id,
                   c.slug AS category_slug,
                   c.is_published AS category_is_published,
                   l.name AS location_name,
                   p.is_published, p.image_url, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN locations l ON l.id = p.location_id
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn get_post_of_author(&self, post_id: Uuid, author_id: Uuid) -> Result<Option<Post>> {
        // The ownership constraint lives in the lookup itself, so a foreign
        // post is indistinguishable from a missing one.
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND author_id = $2"
        ))
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        text: &str,
        pub_date: Option<DateTime<Utc>>,
        category_id: Option<Uuid>,
        location_id: Option<Uuid>,
        is_published: Option<bool>,
        image_url: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, title, text, pub_date, author_id, category_id, location_id, is_published, image_url)
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6, $7, COALESCE($8, TRUE), $9)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::now_v7())
        .bind(title)
        .bind(text)
        .bind(pub_date)
        .bind(author_id)
        .bind(category_id)
        .bind(location_id)
        .bind(is_published)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: Uuid,
        title: Option<&str>,
        text: Option<&str>,
        pub_date: Option<DateTime<Utc>>,
        category_id: Option<Uuid>,
        location_id: Option<Uuid>,
        is_published: Option<bool>,
        image_url: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                text = COALESCE($3, text),
                pub_date = COALESCE($4, pub_date),
                category_id = COALESCE($5, category_id),
                location_id = COALESCE($6, location_id),
                is_published = COALESCE($7, is_published),
                image_url = COALESCE($8, image_url)
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post_id)
        .bind(title)
        .bind(text)
        .bind(pub_date)
        .bind(category_id)
        .bind(location_id)
        .bind(is_published)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT cm.id, cm.post_id, cm.author_id, u.username AS author_username,
                   cm.text, cm.created_at
            FROM comments cm
            JOIN users u ON u.id = cm.author_id
            WHERE cm.post_id = $1
            ORDER BY cm.created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn get_comment(&self, comment_id: Uuid, post_id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, author_id, text, created_at FROM comments WHERE id = $1 AND post_id = $2",
        )
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn get_comment_of_author(
        &self,
        comment_id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, text, created_at
            FROM comments
            WHERE id = $1 AND post_id = $2 AND author_id = $3
            "#,
        )
        .bind(comment_id)
        .bind(post_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn create_comment(&self, post_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, author_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_id, text, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn update_comment(&self, comment_id: Uuid, text: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET text = $2
            WHERE id = $1
            RETURNING id, post_id, author_id, text, created_at
            "#,
        )
        .bind(comment_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
