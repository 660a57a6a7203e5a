//! Authentication against the hosted credential provider
//!
//! Signing in resolves the caller's profile document as well, because the
//! role claim lives there; the result is an explicit [`AuthContext`] rather
//! than state stored inside the client.

mod context;
mod session;

use reqwest::Client;
use serde_json::json;

use crate::error::Error;
use crate::fetch::{ApiErrorBody, Fetch};
use crate::models::UserProfile;
use crate::store::Store;

pub use context::AuthContext;
pub use session::{AuthUser, Session};

/// Client for the auth provider
#[derive(Clone)]
pub struct AuthService {
    url: String,
    key: String,
    client: Client,
    store: Store,
    service_role_key: Option<String>,
}

impl AuthService {
    pub(crate) fn new(
        url: &str,
        key: &str,
        client: Client,
        store: Store,
        service_role_key: Option<String>,
    ) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client,
            store,
            service_role_key,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Sign in with email and password and resolve the caller's profile.
    ///
    /// A credential that authenticates but has no profile document is
    /// rejected; the portal cannot derive a role for it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthContext, Error> {
        let url = self.auth_url("/token?grant_type=password");

        let body = json!({
            "email": email,
            "password": password,
        });

        let response = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .json(&body)?
            .execute_raw()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed = ApiErrorBody::parse(&text);
            if parsed.is_invalid_credentials() {
                return Err(Error::InvalidCredentials);
            }
            return Err(Error::auth(format!(
                "sign-in failed with status {}: {}",
                status,
                parsed.message(&text)
            )));
        }

        let session = response.json::<Session>().await?;
        let profile = self
            .fetch_profile(&session.user.id, &session.access_token)
            .await?
            .ok_or_else(|| Error::auth("authenticated user has no profile document"))?;

        Ok(AuthContext::new(session, profile))
    }

    /// Sign out, revoking the caller's tokens
    pub async fn sign_out(&self, ctx: &AuthContext) -> Result<(), Error> {
        let url = self.auth_url("/logout");

        Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .bearer_auth(ctx.token())
            .execute_no_content()
            .await
    }

    /// Exchange the refresh token for a new session, keeping the resolved profile
    pub async fn refresh(&self, ctx: &AuthContext) -> Result<AuthContext, Error> {
        let url = self.auth_url("/token?grant_type=refresh_token");

        let body = json!({
            "refresh_token": ctx.session.refresh_token,
        });

        let session = Fetch::post(&self.client, &url)
            .header("apikey", &self.key)
            .json(&body)?
            .execute::<Session>()
            .await?;

        Ok(AuthContext::new(session, ctx.profile.clone()))
    }

    /// The privileged admin surface. Errors when no service-role key was
    /// configured.
    pub fn admin(&self) -> Result<AdminAuth, Error> {
        let key = self
            .service_role_key
            .as_deref()
            .ok_or_else(|| Error::auth("service-role key not configured"))?;

        Ok(AdminAuth::new(&self.url, key, self.client.clone()))
    }

    async fn fetch_profile(&self, uid: &str, token: &str) -> Result<Option<UserProfile>, Error> {
        let mut query = self.store.collection("users").select("*");
        query.eq("uid", uid).bearer(token);
        query.execute_one::<UserProfile>().await
    }
}

/// Privileged credential management driven by the service-role key.
///
/// This is how an administrator provisions accounts for other people:
/// credential creation happens server-side and never touches the
/// administrator's own session.
pub struct AdminAuth {
    url: String,
    service_role_key: String,
    client: Client,
}

impl AdminAuth {
    fn new(url: &str, service_role_key: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            service_role_key: service_role_key.to_string(),
            client,
        }
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/auth/v1/admin{}", self.url, path)
    }

    /// Create a credential, pre-confirmed so the owner can sign in at once
    pub async fn create_user(&self, email: &str, password: &str) -> Result<AuthUser, Error> {
        let url = self.admin_url("/users");

        let body = json!({
            "email": email,
            "password": password,
            "email_confirm": true,
        });

        Fetch::post(&self.client, &url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&body)?
            .execute::<AuthUser>()
            .await
            .map_err(|err| Error::auth(format!("failed to create user: {}", err)))
    }

    /// Delete a credential
    pub async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        let url = self.admin_url(&format!("/users/{}", user_id));

        Fetch::delete(&self.client, &url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .execute_no_content()
            .await
            .map_err(|err| Error::auth(format!("failed to delete user: {}", err)))
    }
}
