#![allow(dead_code)]

use rukun::auth::{AuthContext, AuthUser, Session};
use rukun::config::ClientOptions;
use rukun::models::{UserProfile, UserRole};
use rukun::Portal;

pub const ANON_KEY: &str = "test-anon-key";
pub const SERVICE_KEY: &str = "test-service-key";

pub fn portal(url: &str) -> Portal {
    Portal::new(url, ANON_KEY)
}

pub fn portal_with_service_key(url: &str) -> Portal {
    Portal::new_with_options(
        url,
        ANON_KEY,
        ClientOptions::default().with_service_role_key(SERVICE_KEY),
    )
}

pub fn session(uid: &str, token: &str) -> Session {
    Session {
        access_token: token.to_string(),
        refresh_token: format!("{}-refresh", token),
        token_type: "bearer".to_string(),
        expires_in: 3600,
        expires_at: None,
        user: AuthUser {
            id: uid.to_string(),
            email: Some(format!("{}@contoh.com", uid)),
            phone: None,
            role: Some("authenticated".to_string()),
            created_at: None,
        },
    }
}

pub fn profile(uid: &str, role: UserRole) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        email: format!("{}@contoh.com", uid),
        display_name: format!("User {}", uid),
        role,
        phone_number: None,
        house_block: None,
        house_number: None,
        created_at: 1_700_000_000_000,
    }
}

pub fn context(uid: &str, role: UserRole, token: &str) -> AuthContext {
    AuthContext::new(session(uid, token), profile(uid, role))
}

pub fn admin_context() -> AuthContext {
    context("admin-1", UserRole::Admin, "admin-token")
}

pub fn resident_context() -> AuthContext {
    context("resident-1", UserRole::Resident, "resident-token")
}
