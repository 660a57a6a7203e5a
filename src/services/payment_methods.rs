//! Payment instructions shown to residents when paying dues

use log::warn;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::media::{MediaClient, UploadFile};
use crate::models::{PaymentMethod, PaymentMethodKind};
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "payment_methods";

/// The fields an admin controls when creating or updating a method.
/// `id: None` creates, `id: Some(..)` replaces.
#[derive(Debug, Clone)]
pub struct PaymentMethodDraft {
    pub id: Option<String>,
    pub kind: PaymentMethodKind,
    /// Bank name or QRIS label
    pub name: String,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    /// Existing QRIS image URL, kept when no new file is uploaded
    pub qris_image_url: Option<String>,
}

/// Service for payment method records
pub struct PaymentMethodService {
    store: Store,
    media: MediaClient,
}

impl PaymentMethodService {
    pub(crate) fn new(store: Store, media: MediaClient) -> Self {
        Self { store, media }
    }

    /// The methods residents are offered: active ones only
    pub async fn active(&self) -> Result<Vec<PaymentMethod>, Error> {
        let mut query = self.store.collection(COLLECTION).select("*");
        query.eq("is_active", true);
        query.execute().await
    }

    /// Create or replace a payment method; returns its id.
    ///
    /// Fields of the other variant are cleared: a bank method carries no
    /// QRIS image, a QRIS method no account data. A QRIS image file, when
    /// given, is uploaded and replaces the draft's existing URL.
    pub async fn save(
        &self,
        ctx: &AuthContext,
        draft: PaymentMethodDraft,
        qris_image: Option<UploadFile>,
    ) -> Result<String, Error> {
        ctx.require_admin()?;

        let id = draft
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let method = match draft.kind {
            PaymentMethodKind::Bank => PaymentMethod {
                id: id.clone(),
                kind: PaymentMethodKind::Bank,
                name: draft.name,
                account_number: draft.account_number,
                account_holder: draft.account_holder,
                qris_image_url: None,
                is_active: true,
            },
            PaymentMethodKind::Qris => {
                let qris_image_url = match qris_image {
                    Some(file) => {
                        // addressed by method id, not the uploaded filename
                        let path = format!("payment_methods/{}_{}", id, now_millis());
                        Some(self.media.upload(ctx, &path, file.bytes).await?)
                    }
                    None => draft.qris_image_url,
                };
                PaymentMethod {
                    id: id.clone(),
                    kind: PaymentMethodKind::Qris,
                    name: draft.name,
                    account_number: None,
                    account_holder: None,
                    qris_image_url,
                    is_active: true,
                }
            }
        };

        let mut upsert = self.store.collection(COLLECTION).upsert(&method);
        upsert.on_conflict("id").authed(ctx);
        upsert.execute_no_return().await?;

        Ok(id)
    }

    /// Delete a payment method, then best-effort its QRIS image blob
    pub async fn delete(
        &self,
        ctx: &AuthContext,
        id: &str,
        qris_path: Option<&str>,
    ) -> Result<(), Error> {
        ctx.require_admin()?;

        let mut delete = self.store.collection(COLLECTION).delete();
        delete.eq("id", id).authed(ctx);
        delete.execute_no_return().await?;

        if let Some(path) = qris_path {
            if let Err(err) = self.media.delete(ctx, path).await {
                warn!("QRIS image {} was not deleted: {}", path, err);
            }
        }

        Ok(())
    }
}
