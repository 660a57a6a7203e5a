//! Blob storage for uploaded media
//!
//! One public bucket holds every upload (payment proofs, complaint photos,
//! news images, gallery photos, QRIS images), addressed by path prefixes
//! per concern.

use reqwest::{multipart, Client};
use std::path::Path;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::fetch::Fetch;

/// An in-memory file handed to an upload operation
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Client for the blob store, scoped to the portal's media bucket
#[derive(Clone)]
pub struct MediaClient {
    url: String,
    key: String,
    bucket: String,
    client: Client,
}

impl MediaClient {
    pub(crate) fn new(url: &str, key: &str, bucket: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            bucket: bucket.to_string(),
            client,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.url, self.bucket, path)
    }

    /// Upload a blob and return its public download URL
    pub async fn upload(
        &self,
        ctx: &AuthContext,
        path: &str,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        let url = self.object_url(path);

        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());

        let form =
            multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(filename));

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.key)
            .bearer_auth(ctx.token())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::storage(format!(
                "upload of {} failed with status {}: {}",
                path, status, text
            )));
        }

        Ok(self.public_url(path))
    }

    /// Delete a blob
    pub async fn delete(&self, ctx: &AuthContext, path: &str) -> Result<(), Error> {
        let url = self.object_url(path);

        Fetch::delete(&self.client, &url)
            .header("apikey", &self.key)
            .bearer_auth(ctx.token())
            .execute_no_content()
            .await
            .map_err(|err| Error::storage(format!("delete of {} failed: {}", path, err)))
    }

    /// The public download URL for a blob
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.url, self.bucket, path
        )
    }
}
