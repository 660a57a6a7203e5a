//! Dues collection and the verification workflow
//!
//! Payments are never deleted and their status moves exactly once:
//! `pending` to `success` or `pending` to `failed`. Manual (cash) records
//! skip the queue and are created in `success` directly.

use log::debug;
use serde_json::json;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::media::{MediaClient, UploadFile};
use crate::models::{Payment, PaymentStatus};
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "payments";

/// Method tag recorded for cash handed to the treasurer in person
pub const METHOD_CASH_MANUAL: &str = "cash_manual";

/// A resident's dues submission
#[derive(Debug, Clone)]
pub struct DuesSubmission {
    pub amount: i64,
    /// Billing month, 1-12
    pub month: u32,
    pub year: i32,
    /// Tag of the payment method the resident used, e.g. a bank name or "qris"
    pub payment_method: String,
}

/// Service for dues payments
pub struct PaymentService {
    store: Store,
    media: MediaClient,
}

impl PaymentService {
    pub(crate) fn new(store: Store, media: MediaClient) -> Self {
        Self { store, media }
    }

    /// Submit dues for verification. The optional proof of transfer is
    /// uploaded first; the payment row starts in `pending`.
    ///
    /// Nothing deduplicates submissions: sending the same period twice
    /// creates two pending rows.
    pub async fn submit_dues(
        &self,
        ctx: &AuthContext,
        dues: DuesSubmission,
        proof: Option<UploadFile>,
    ) -> Result<Payment, Error> {
        ctx.require_resident()?;

        let proof_url = match proof {
            Some(file) => {
                let path = format!(
                    "payments/{}/{}_{}",
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
            "amount": dues.amount,
            "month": dues.month,
            "year": dues.year,
            "status": PaymentStatus::Pending,
            "payment_method": dues.payment_method,
            "proof_url": proof_url,
            "created_at": now_millis(),
        });

        let mut insert = self.store.collection(COLLECTION).insert(row);
        insert.authed(ctx);
        let created: Vec<Payment> = insert.execute().await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("payment insert returned no row"))
    }

    /// Approve or reject a pending payment, recording the verifying admin.
    ///
    /// Rows that already reached `success` or `failed` are terminal and the
    /// call fails without writing. A failed write propagates as-is; the
    /// caller must re-invoke, nothing retries.
    pub async fn verify(
        &self,
        ctx: &AuthContext,
        payment_id: &str,
        approve: bool,
    ) -> Result<Payment, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query.eq("id", payment_id).authed(ctx);
        let payment: Payment = query
            .execute_one()
            .await?
            .ok_or_else(|| Error::NotFound(format!("payment {}", payment_id)))?;

        if payment.status != PaymentStatus::Pending {
            return Err(Error::InvalidTransition(format!(
                "payment {} is already {}",
                payment_id, payment.status
            )));
        }

        let next = if approve {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };
        debug!("verifying payment {}: {} -> {}", payment_id, payment.status, next);

        let mut update = self.store.collection(COLLECTION).update(json!({
            "status": next,
            "verified_by": ctx.uid(),
            "verified_at": now_millis(),
        }));
        update.eq("id", payment_id).authed(ctx);
        let updated: Vec<Payment> = update.execute().await?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("payment update returned no row"))
    }

    /// Record dues paid in cash directly to the treasurer. The row is
    /// created in `success`, bypassing verification, with the recording
    /// admin as verifier.
    pub async fn record_manual(
        &self,
        ctx: &AuthContext,
        user_id: &str,
        amount: i64,
        month: u32,
        year: i32,
    ) -> Result<Payment, Error> {
        ctx.require_admin()?;

        let row = json!({
            "user_id": user_id,
            "amount": amount,
            "month": month,
            "year": year,
            "status": PaymentStatus::Success,
            "payment_method": METHOD_CASH_MANUAL,
            "verified_by": ctx.uid(),
            "created_at": now_millis(),
        });

        let mut insert = self.store.collection(COLLECTION).insert(row);
        insert.authed(ctx);
        let created: Vec<Payment> = insert.execute().await?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("payment insert returned no row"))
    }

    /// The verification queue: pending payments, newest first
    pub async fn pending_payments(&self, ctx: &AuthContext) -> Result<Vec<Payment>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .eq("status", PaymentStatus::Pending.as_str())
            .order("created_at", false)
            .authed(ctx);
        query.execute().await
    }

    /// The income ledger: successful payments by billing period, newest first
    pub async fn success_payments(&self, ctx: &AuthContext) -> Result<Vec<Payment>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .eq("status", PaymentStatus::Success.as_str())
            .order("year", false)
            .order("month", false)
            .authed(ctx);
        query.execute().await
    }

    /// A user's own payment history. Residents may only read their own;
    /// admins may read anyone's.
    pub async fn history_for(
        &self,
        ctx: &AuthContext,
        user_id: &str,
    ) -> Result<Vec<Payment>, Error> {
        if !ctx.can_access_user(user_id) {
            return Err(Error::forbidden("cannot read another user's payments"));
        }

        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .eq("user_id", user_id)
            .order("created_at", false)
            .authed(ctx);
        query.execute().await
    }
}
