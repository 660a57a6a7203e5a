//! Resident complaints (aduan) tracked to resolution

use serde_json::json;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::media::{MediaClient, UploadFile};
use crate::models::{Complaint, ComplaintStatus};
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "complaints";

/// Service for complaint records
pub struct ComplaintService {
    store: Store,
    media: MediaClient,
}

impl ComplaintService {
    pub(crate) fn new(store: Store, media: MediaClient) -> Self {
        Self { store, media }
    }

    /// File a new complaint, optionally with a photo. The row starts in
    /// `pending`.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        title: &str,
        description: &str,
        photo: Option<UploadFile>,
    ) -> Result<Complaint, Error> {
        ctx.require_resident()?;

        let image_url = match photo {
            Some(file) => {
                let path = format!(
                    "complaints/{}/{}_{}",
                    ctx.uid(),
                    now_millis(),
                    file.filename
                );
                Some(self.media.upload(ctx, &path, file.bytes).await?)
            }
            None => None,
        };

        let row = json!({
            "user_id": ctx.uid(),
            "title": title,
            "description": description,
            "image_url": image_url,
            "status": ComplaintStatus::Pending,
            "created_at": now_millis(),
        });

        let mut insert = self.store.collection(COLLECTION).insert(row);
        insert.authed(ctx);
        let created: Vec<Complaint> = insert.execute().await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("complaint insert returned no row"))
    }

    /// A user's own complaint history, newest first. Residents may only
    /// read their own; admins may read anyone's.
    pub async fn for_user(
        &self,
        ctx: &AuthContext,
        user_id: &str,
    ) -> Result<Vec<Complaint>, Error> {
        if !ctx.can_access_user(user_id) {
            return Err(Error::forbidden("cannot read another user's complaints"));
        }

        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .eq("user_id", user_id)
            .order("created_at", false)
            .authed(ctx);
        query.execute().await
    }

    /// Every complaint, newest first, optionally narrowed to one status
    pub async fn all(
        &self,
        ctx: &AuthContext,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<Complaint>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query.order("created_at", false).authed(ctx);
        if let Some(status) = status {
            query.eq("status", status.as_str());
        }
        query.execute().await
    }

    /// Set a complaint's status and the admin's free-text response.
    /// No transition restrictions exist: any status is reachable from any
    /// other, and the response may be rewritten.
    pub async fn update_status(
        &self,
        ctx: &AuthContext,
        id: &str,
        status: ComplaintStatus,
        response: Option<&str>,
    ) -> Result<Complaint, Error> {
        ctx.require_admin()?;

        let mut update = self.store.collection(COLLECTION).update(json!({
            "status": status,
            "response": response.unwrap_or_default(),
            "updated_at": now_millis(),
        }));
        update.eq("id", id).authed(ctx);
        let updated: Vec<Complaint> = update.execute().await?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("complaint {}", id)))
    }
}
