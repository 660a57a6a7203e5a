//! Document store operations over the backend's REST surface

mod query;

use reqwest::Client;
use serde::Serialize;

pub use query::*;

/// Client for the document store
#[derive(Clone)]
pub struct Store {
    /// The base URL for the backend project
    url: String,

    /// The anonymous API key
    key: String,

    /// HTTP client
    client: Client,
}

impl Store {
    pub(crate) fn new(url: &str, key: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client,
        }
    }

    /// Get a handle to one collection
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(
            format!("{}/rest/v1/{}", self.url, name),
            self.key.clone(),
            self.client.clone(),
        )
    }
}

/// Handle to a single collection, from which queries are built
pub struct Collection {
    url: String,
    key: String,
    client: Client,
}

impl Collection {
    fn new(url: String, key: String, client: Client) -> Self {
        Self { url, key, client }
    }

    /// Select columns from the collection
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.url.clone(), self.key.clone(), columns, self.client.clone())
    }

    /// Insert a document
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.url.clone(), self.key.clone(), values, self.client.clone())
    }

    /// Update matching documents
    pub fn update<T: Serialize>(&self, values: T) -> UpdateBuilder<T> {
        UpdateBuilder::new(self.url.clone(), self.key.clone(), values, self.client.clone())
    }

    /// Insert a document, replacing an existing one with the same key
    pub fn upsert<T: Serialize>(&self, values: T) -> UpsertBuilder<T> {
        UpsertBuilder::new(self.url.clone(), self.key.clone(), values, self.client.clone())
    }

    /// Delete matching documents
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.url.clone(), self.key.clone(), self.client.clone())
    }
}
