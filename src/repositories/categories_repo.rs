use async_trait::async_trait;

use crate::{
    models::categories::{Category, Location},
    Result,
};

use super::PostgresRepo;

#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    async fn list_published_categories(&self) -> Result<Vec<Category>>;
    async fn list_published_locations(&self) -> Result<Vec<Location>>;
}

#[async_trait]
impl CategoriesRepository for PostgresRepo {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE slug = $1 AND is_published
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list_published_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE is_published
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn list_published_locations(&self) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            r#"
            SELECT id, name, is_published, created_at
            FROM locations
            WHERE is_published
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }
}
