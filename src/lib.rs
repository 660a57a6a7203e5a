//! Rukun — service layer for a neighborhood-association community portal
//!
//! Everything persistent lives in a hosted backend: a document store with
//! simple equality/range/order-by queries, a credential auth provider whose
//! role claim is mirrored in the `users` collection, and a blob store with
//! public download URLs. This crate wraps that surface with typed clients
//! and encodes the portal's business rules (dues verification, expense
//! ledger, complaints, news, agenda, gallery, dashboard aggregates) in
//! domain services.
//!
//! # Example
//!
//! ```no_run
//! use rukun::Portal;
//! use rukun::services::DuesSubmission;
//!
//! # async fn run() -> Result<(), rukun::Error> {
//! let portal = Portal::new("https://project.example.com", "anon-key");
//!
//! let ctx = portal.auth().sign_in("warga@contoh.com", "secret").await?;
//! let payment = portal
//!     .payments()
//!     .submit_dues(
//!         &ctx,
//!         DuesSubmission {
//!             amount: 100_000,
//!             month: 5,
//!             year: 2025,
//!             payment_method: "transfer".to_string(),
//!         },
//!         None,
//!     )
//!     .await?;
//! println!("submitted payment {}", payment.id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod media;
pub mod models;
pub mod services;
pub mod store;

use reqwest::Client;

use crate::auth::AuthService;
use crate::config::ClientOptions;
use crate::media::MediaClient;
use crate::services::{
    ActivityService, ComplaintService, DashboardService, ExpenseService, GalleryService,
    PaymentMethodService, PaymentService, ScheduleService, UserService,
};
use crate::store::Store;

/// The main entry point for the portal client
pub struct Portal {
    /// The base URL for the backend project
    pub url: String,
    /// The anonymous API key
    pub key: String,
    /// HTTP client shared by every sub-client
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl Portal {
    /// Create a new portal client with default options
    pub fn new(url: &str, key: &str) -> Self {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a new portal client with custom options
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_else(|_| Client::new());

        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            http_client,
            options,
        }
    }

    /// The auth client: sign-in, sign-out, and the privileged admin surface
    pub fn auth(&self) -> AuthService {
        AuthService::new(
            &self.url,
            &self.key,
            self.http_client.clone(),
            self.store(),
            self.options.service_role_key.clone(),
        )
    }

    /// The raw document store
    pub fn store(&self) -> Store {
        Store::new(&self.url, &self.key, self.http_client.clone())
    }

    /// The blob store, scoped to the configured media bucket
    pub fn media(&self) -> MediaClient {
        MediaClient::new(
            &self.url,
            &self.key,
            &self.options.media_bucket,
            self.http_client.clone(),
        )
    }

    /// Resident accounts and provisioning
    pub fn users(&self) -> UserService {
        UserService::new(self.store(), self.auth())
    }

    /// Dues payments and the verification workflow
    pub fn payments(&self) -> PaymentService {
        PaymentService::new(self.store(), self.media())
    }

    /// The expense ledger
    pub fn expenses(&self) -> ExpenseService {
        ExpenseService::new(self.store())
    }

    /// Resident complaints
    pub fn complaints(&self) -> ComplaintService {
        ComplaintService::new(self.store(), self.media())
    }

    /// News posts
    pub fn activities(&self) -> ActivityService {
        ActivityService::new(self.store(), self.media())
    }

    /// The community agenda
    pub fn schedules(&self) -> ScheduleService {
        ScheduleService::new(self.store())
    }

    /// The photo gallery
    pub fn gallery(&self) -> GalleryService {
        GalleryService::new(self.store(), self.media())
    }

    /// Payment instructions shown to residents
    pub fn payment_methods(&self) -> PaymentMethodService {
        PaymentMethodService::new(self.store(), self.media())
    }

    /// Dashboard aggregates
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.store())
    }
}

pub use error::Error;

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::AuthContext;
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::media::UploadFile;
    pub use crate::models::*;
    pub use crate::Portal;
}
