//! Resident accounts and provisioning

use log::error;
use serde_json::{json, Map, Value};

use crate::auth::{AuthContext, AuthService};
use crate::error::Error;
use crate::models::{UserProfile, UserRole};
use crate::store::Store;

use super::now_millis;

const COLLECTION: &str = "users";

/// Everything needed to provision a resident account
#[derive(Debug, Clone)]
pub struct NewResident {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub block: String,
    pub number: String,
    /// Initial password, handed to the resident out of band
    pub password: String,
}

/// Admin-editable profile fields; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub house_block: Option<String>,
    pub house_number: Option<String>,
}

/// Service for user profiles
pub struct UserService {
    store: Store,
    auth: AuthService,
}

impl UserService {
    pub(crate) fn new(store: Store, auth: AuthService) -> Self {
        Self { store, auth }
    }

    /// Every resident, ordered by display name
    pub async fn residents(&self, ctx: &AuthContext) -> Result<Vec<UserProfile>, Error> {
        ctx.require_admin()?;

        let mut query = self.store.collection(COLLECTION).select("*");
        query
            .eq("role", "resident")
            .order("display_name", true)
            .authed(ctx);
        query.execute().await
    }

    /// A single profile by user id
    pub async fn profile(
        &self,
        ctx: &AuthContext,
        uid: &str,
    ) -> Result<Option<UserProfile>, Error> {
        if !ctx.can_access_user(uid) {
            return Err(Error::forbidden("cannot read another user's profile"));
        }

        let mut query = self.store.collection(COLLECTION).select("*");
        query.eq("uid", uid).authed(ctx);
        query.execute_one().await
    }

    /// Provision a resident: one credential plus one profile document with
    /// the same id, created through the privileged admin API so the calling
    /// administrator's own session is never touched.
    ///
    /// The two writes are not transactional. If the profile insert fails
    /// the credential stays behind without a profile; the error propagates
    /// and the admin retries or cleans up by hand.
    pub async fn create_resident(
        &self,
        ctx: &AuthContext,
        resident: NewResident,
    ) -> Result<UserProfile, Error> {
        ctx.require_admin()?;

        let admin_api = self.auth.admin()?;
        let credential = admin_api
            .create_user(&resident.email, &resident.password)
            .await?;

        let profile = UserProfile {
            uid: credential.id.clone(),
            email: resident.email,
            display_name: resident.name,
            role: UserRole::Resident,
            phone_number: Some(resident.phone),
            house_block: Some(resident.block),
            house_number: Some(resident.number),
            created_at: now_millis(),
        };

        let mut insert = self.store.collection(COLLECTION).insert(&profile);
        insert.authed(ctx);
        insert.execute_no_return().await.map_err(|err| {
            error!(
                "profile insert failed; credential {} has no profile: {}",
                credential.id, err
            );
            err
        })?;

        Ok(profile)
    }

    /// Edit a resident's profile fields
    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        ctx.require_admin()?;

        let mut changes = Map::new();
        if let Some(name) = update.display_name {
            changes.insert("display_name".to_string(), json!(name));
        }
        if let Some(phone) = update.phone_number {
            changes.insert("phone_number".to_string(), json!(phone));
        }
        if let Some(block) = update.house_block {
            changes.insert("house_block".to_string(), json!(block));
        }
        if let Some(number) = update.house_number {
            changes.insert("house_number".to_string(), json!(number));
        }
        if changes.is_empty() {
            return self
                .profile(ctx, uid)
                .await?
                .ok_or_else(|| Error::NotFound(format!("user {}", uid)));
        }

        let mut update = self
            .store
            .collection(COLLECTION)
            .update(Value::Object(changes));
        update.eq("uid", uid).authed(ctx);
        let updated: Vec<UserProfile> = update.execute().await?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("user {}", uid)))
    }
}
