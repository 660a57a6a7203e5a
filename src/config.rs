//! Configuration options for the portal client

use std::time::Duration;

/// Configuration options for the portal client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied to the shared HTTP client
    pub request_timeout: Option<Duration>,

    /// The storage bucket holding uploaded media (proofs, photos, QRIS images)
    pub media_bucket: String,

    /// Privileged service-role key. Required only for operations that go
    /// through the admin auth API, such as resident provisioning.
    pub service_role_key: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            media_bucket: "portal-media".to_string(),
            service_role_key: None,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the media bucket
    pub fn with_media_bucket(mut self, value: &str) -> Self {
        self.media_bucket = value.to_string();
        self
    }

    /// Set the service-role key used by the admin auth API
    pub fn with_service_role_key(mut self, value: &str) -> Self {
        self.service_role_key = Some(value.to_string());
        self
    }
}
