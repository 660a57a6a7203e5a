//! The public photo gallery
//!
//! Gallery items are the one place a delete spans both stores. The blob is
//! removed best-effort: an already-missing blob must not leave the document
//! behind, so a failed blob delete is logged and the document delete's
//! result is what the operation reports.

use log::warn;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::media::{MediaClient, UploadFile};
use crate::models::GalleryItem;
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "gallery";

/// Service for gallery photos
pub struct GalleryService {
    store: Store,
    media: MediaClient,
}

impl GalleryService {
    pub(crate) fn new(store: Store, media: MediaClient) -> Self {
        Self { store, media }
    }

    /// Every photo, newest upload first
    pub async fn items(&self) -> Result<Vec<GalleryItem>, Error> {
        let mut query = self.store.collection(COLLECTION).select("*");
        query.order("created_at", false);
        query.execute().await
    }

    /// Upload a photo: blob first, then the document pointing at it
    pub async fn upload(&self, ctx: &AuthContext, file: UploadFile) -> Result<GalleryItem, Error> {
        ctx.require_admin()?;

        let id = Uuid::new_v4().to_string();
        let storage_path = format!("gallery/{}_{}_{}", id, now_millis(), file.filename);
        let url = self.media.upload(ctx, &storage_path, file.bytes).await?;

        let item = GalleryItem {
            id,
            url,
            storage_path,
            created_at: now_millis(),
        };

        let mut insert = self.store.collection(COLLECTION).insert(&item);
        insert.authed(ctx);
        insert.execute_no_return().await?;

        Ok(item)
    }

    /// Delete a photo's blob (best effort) and its document
    pub async fn delete(
        &self,
        ctx: &AuthContext,
        id: &str,
        storage_path: &str,
    ) -> Result<(), Error> {
        ctx.require_admin()?;

        if let Err(err) = self.media.delete(ctx, storage_path).await {
            warn!("gallery blob {} was not deleted: {}", storage_path, err);
        }

        let mut delete = self.store.collection(COLLECTION).delete();
        delete.eq("id", id).authed(ctx);
        delete.execute_no_return().await
    }
}
