//! News posts / activity reports for the public site

use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::media::{MediaClient, UploadFile};
use crate::models::{Activity, ActivityAuthor, ActivityStatus};
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "activities";

/// Derive a URL-safe slug from a post title.
///
/// Lowercases, strips everything that is not a word character, whitespace
/// or hyphen, then collapses separator runs into single hyphens:
/// `"Kerja Bakti RT!!"` becomes `"kerja-bakti-rt"`.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = !slug.is_empty();
        } else if c.is_alphanumeric() {
            if pending_separator {
                slug.push('-');
                pending_separator = false;
            }
            slug.push(c);
        }
        // every other character is dropped
    }

    slug
}

/// The fields an editor controls when creating or updating a post.
/// `id: None` creates, `id: Some(..)` replaces.
#[derive(Debug, Clone, Default)]
pub struct ActivityDraft {
    pub id: Option<String>,
    pub title: String,
    /// Explicit slug override; derived from the title when absent
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    /// Existing cover image URL, kept when no new file is uploaded
    pub main_image: Option<String>,
    /// Existing gallery URLs; new uploads are appended
    pub gallery: Vec<String>,
    pub date: i64,
    pub location: Option<String>,
    pub status: Option<ActivityStatus>,
    pub is_featured: bool,
    pub created_at: Option<i64>,
}

/// Service for news posts
pub struct ActivityService {
    store: Store,
    media: MediaClient,
}

impl ActivityService {
    pub(crate) fn new(store: Store, media: MediaClient) -> Self {
        Self { store, media }
    }

    /// Create or replace a post. New images are uploaded under the post's
    /// id; gallery uploads are appended to the draft's existing URLs.
    /// Returns the post id.
    ///
    /// Slug uniqueness is not enforced here or in the backend.
    pub async fn save(
        &self,
        ctx: &AuthContext,
        draft: ActivityDraft,
        main_image: Option<UploadFile>,
        gallery_files: Vec<UploadFile>,
    ) -> Result<String, Error> {
        ctx.require_admin()?;

        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let main_image_url = match main_image {
            Some(file) => {
                let path = format!("activities/{}/main_{}_{}", id, now_millis(), file.filename);
                self.media.upload(ctx, &path, file.bytes).await?
            }
            None => draft.main_image.clone().unwrap_or_default(),
        };

        let mut gallery = draft.gallery.clone();
        for file in gallery_files {
            let path = format!(
                "activities/{}/gallery_{}_{}",
                id,
                now_millis(),
                file.filename
            );
            gallery.push(self.media.upload(ctx, &path, file.bytes).await?);
        }

        let activity = Activity {
            id: id.clone(),
            slug: draft.slug.unwrap_or_else(|| generate_slug(&draft.title)),
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            main_image: main_image_url,
            gallery,
            date: draft.date,
            location: draft.location,
            author: Some(ActivityAuthor {
                uid: ctx.uid().to_string(),
                display_name: ctx.profile.display_name.clone(),
            }),
            status: draft.status.unwrap_or(ActivityStatus::Published),
            is_featured: draft.is_featured,
            created_at: draft.created_at.unwrap_or_else(now_millis),
        };

        let mut upsert = self.store.collection(COLLECTION).upsert(&activity);
        upsert.on_conflict("id").authed(ctx);
        upsert.execute_no_return().await?;

        Ok(id)
    }

    /// Every post, drafts included, newest event first
    pub async fn all(&self, ctx: &AuthContext) -> Result<Vec<Activity>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query.order("date", false).authed(ctx);
        query.execute().await
    }

    /// Published posts for the public site, newest event first
    pub async fn published(&self, limit: Option<u32>) -> Result<Vec<Activity>, Error> {
        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .eq("status", "published")
            .order("date", false);
        if let Some(limit) = limit {
            query.limit(limit);
        }
        query.execute().await
    }

    /// Look a post up by slug. Slugs are not unique; the first match wins.
    pub async fn by_slug(&self, slug: &str) -> Result<Option<Activity>, Error> {
        let mut query = self.store.collection(COLLECTION).select("*");
        query.eq("slug", slug);
        query.execute_one().await
    }

    /// Delete the post document. Its images stay in the bucket.
    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<(), Error> {
        ctx.require_admin()?;

        let mut delete = self.store.collection(COLLECTION).delete();
        delete.eq("id", id).authed(ctx);
        delete.execute_no_return().await
    }
}
