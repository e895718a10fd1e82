use chrono::Utc;
use uuid::Uuid;

use crate::{
    models::{
        categories::{Category, Location},
        comments::{Comment, CommentWithAuthor},
        pagination::{page_offset, resolve_page, total_pages, Page, PAGE_SIZE},
        posts::{CreatePostDto, Post, PostDetail, PostPreview, UpdatePostDto},
        users::User,
    },
    repositories::{
        categories_repo::CategoriesRepository, posts_repo::PostsRepository, PostgresRepo,
    },
    Error, Result,
};

#[derive(Clone)]
pub struct PostsService {
    repo: PostgresRepo,
}

impl PostsService {
    pub fn new(repo: PostgresRepo) -> Self {
        Self { repo }
    }

    /// Home page: publicly visible posts, newest first.
    pub async fn home_page(&self, requested_page: Option<&str>) -> Result<Page<PostPreview>> {
        let total = self.repo.count_public().await?;
        let pages = total_pages(total);
        let number = resolve_page(requested_page, pages);
        let items = self
            .repo
            .list_public(PAGE_SIZE, page_offset(number))
            .await?;

        Ok(Page::new(items, number, pages))
    }

    /// Category page: the category must exist and be published, otherwise the
    /// whole page is a 404.
    pub async fn category_page(
        &self,
        slug: &str,
        requested_page: Option<&str>,
    ) -> Result<(Category, Page<PostPreview>)> {
        let category = self
            .repo
            .find_published_by_slug(slug)
            .await?
            .ok_or(Error::NotFound)?;

        let total = self.repo.count_in_category(category.id).await?;
        let pages = total_pages(total);
        let number = resolve_page(requested_page, pages);
        let items = self
            .repo
            .list_in_category(category.id, PAGE_SIZE, page_offset(number))
            .await?;

        Ok((category, Page::new(items, number, pages)))
    }

    /// Profile page: the owner sees every post of theirs, anyone else only the
    /// publicly visible ones.
    pub async fn profile_page(
        &self,
        profile_user: &User,
        viewer: Option<Uuid>,
        requested_page: Option<&str>,
    ) -> Result<Page<PostPreview>> {
        let public_only = viewer != Some(profile_user.id);

        let total = self
            .repo
            .count_by_author(profile_user.id, public_only)
            .await?;
        let pages = total_pages(total);
        let number = resolve_page(requested_page, pages);
        let items = self
            .repo
            .list_by_author(profile_user.id, public_only, PAGE_SIZE, page_offset(number))
            .await?;

        Ok(Page::new(items, number, pages))
    }

    /// Detail page: a hidden post is a 404 for everyone but its author.
    pub async fn post_detail(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<(PostDetail, Vec<CommentWithAuthor>)> {
        let post = self
            .repo
            .get_post_detail(post_id)
            .await?
            .ok_or(Error::NotFound)?;

        if !post.is_visible_to(viewer, Utc::now()) {
            return Err(Error::NotFound);
        }

        let comments = self.repo.get_comments_for_post(post_id).await?;

        Ok((post, comments))
    }

    /// Published categories and locations offered on the post form.
    pub async fn form_choices(&self) -> Result<(Vec<Category>, Vec<Location>)> {
        let categories = self.repo.list_published_categories().await?;
        let locations = self.repo.list_published_locations().await?;
        Ok((categories, locations))
    }

    pub async fn create_post(&self, author_id: Uuid, new_post: CreatePostDto) -> Result<Post> {
        self.repo
            .create_post(
                author_id,
                &new_post.title,
                &new_post.text,
                new_post.pub_date,
                new_post.category_id,
                new_post.location_id,
                new_post.is_published,
                new_post.image_url.as_deref(),
            )
            .await
    }

    /// Loads a post for editing. `Ok(None)` means the post exists but the
    /// actor is not its author; the handler turns that into a silent redirect.
    pub async fn post_for_edit(&self, post_id: Uuid, actor_id: Uuid) -> Result<Option<Post>> {
        let post = self.repo.get_post(post_id).await?.ok_or(Error::NotFound)?;

        if post.author_id != actor_id {
            return Ok(None);
        }

        Ok(Some(post))
    }

    pub async fn update_post(
        &self,
        post_id: Uuid,
        actor_id: Uuid,
        update: UpdatePostDto,
    ) -> Result<Option<Post>> {
        if self.post_for_edit(post_id, actor_id).await?.is_none() {
            return Ok(None);
        }

        let post = self
            .repo
            .update_post(
                post_id,
                update.title.as_deref(),
                update.text.as_deref(),
                update.pub_date,
                update.category_id,
                update.location_id,
                update.is_published,
                update.image_url.as_deref(),
            )
            .await?;

        Ok(Some(post))
    }

    /// The delete lookup is scoped to the author, so a foreign post is a 404.
    pub async fn post_for_delete(&self, post_id: Uuid, actor_id: Uuid) -> Result<Post> {
        self.repo
            .get_post_of_author(post_id, actor_id)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn delete_post(&self, post_id: Uuid, actor_id: Uuid) -> Result<()> {
        let post = self.post_for_delete(post_id, actor_id).await?;
        self.repo.delete_post(post.id).await
    }

    /// Commenting requires only that the post exists; hidden posts accept
    /// comments from their author via the detail page.
    pub async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.repo.get_post(post_id).await?.ok_or(Error::NotFound)
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment> {
        self.require_post(post_id).await?;
        self.repo.create_comment(post_id, author_id, text).await
    }

    pub async fn comment_for_edit(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Option<Comment>> {
        let comment = self
            .repo
            .get_comment(comment_id, post_id)
            .await?
            .ok_or(Error::NotFound)?;

        if comment.author_id != actor_id {
            return Ok(None);
        }

        Ok(Some(comment))
    }

    pub async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>> {
        if self
            .comment_for_edit(post_id, comment_id, actor_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let comment = self.repo.update_comment(comment_id, text).await?;

        Ok(Some(comment))
    }

    pub async fn comment_for_delete(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor_id: Uuid,
    ) -> Result<Comment> {
        self.repo
            .get_comment_of_author(comment_id, post_id, actor_id)
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        actor_id: Uuid,
    ) -> Result<()> {
        let comment = self.comment_for_delete(post_id, comment_id, actor_id).await?;
        self.repo.delete_comment(comment.id).await
    }
}
