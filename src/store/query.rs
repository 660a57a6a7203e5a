//! Query builders for the document store
//!
//! Every builder carries the caller's identity explicitly: role-gated reads
//! and writes attach the caller's access token via [`authed`], public reads
//! fall back to the anonymous key.
//!
//! [`authed`]: SelectBuilder::authed

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::auth::AuthContext;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

/// Base query parameter set
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: HashMap<String, String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Add a parameter, replacing an existing one with the same key
    pub fn add_param(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_string(), value.to_string());
    }

    /// Append to the comma-separated `order` parameter
    pub fn add_order(&mut self, column: &str, ascending: bool) {
        let direction = if ascending { "asc" } else { "desc" };
        let term = format!("{}.{}", column, direction);
        match self.params.get_mut("order") {
            Some(existing) => {
                existing.push(',');
                existing.push_str(&term);
            }
            None => {
                self.params.insert("order".to_string(), term);
            }
        }
    }

    pub fn get_params(&self) -> &HashMap<String, String> {
        &self.params
    }
}

fn apply_auth<'a>(
    fetch: FetchBuilder<'a>,
    key: &str,
    bearer: &Option<String>,
) -> FetchBuilder<'a> {
    let token = bearer.as_deref().unwrap_or(key);
    fetch.header("apikey", key).bearer_auth(token)
}

/// Builder for read queries
pub struct SelectBuilder {
    url: String,
    key: String,
    client: Client,
    query: QueryBuilder,
    bearer: Option<String>,
}

impl SelectBuilder {
    pub(crate) fn new(url: String, key: String, columns: &str, client: Client) -> Self {
        let mut query = QueryBuilder::new();
        query.add_param("select", columns);

        Self {
            url,
            key,
            client,
            query,
            bearer: None,
        }
    }

    /// Attach the caller's identity to the request
    pub fn authed(&mut self, ctx: &AuthContext) -> &mut Self {
        self.bearer = Some(ctx.token().to_string());
        self
    }

    /// Attach a raw access token. Sign-in needs this before a full
    /// [`AuthContext`] exists.
    pub(crate) fn bearer(&mut self, token: &str) -> &mut Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(&mut self, column: &str, value: T) -> &mut Self {
        let filter = format!("eq.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Filter rows where column is greater than or equal to a value
    pub fn gte<T: ToString>(&mut self, column: &str, value: T) -> &mut Self {
        let filter = format!("gte.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Order the results by a column; repeated calls refine the ordering
    pub fn order(&mut self, column: &str, ascending: bool) -> &mut Self {
        self.query.add_order(column, ascending);
        self
    }

    /// Limit the number of rows returned
    pub fn limit(&mut self, count: u32) -> &mut Self {
        self.query.add_param("limit", &count.to_string());
        self
    }

    /// Execute the query and return all matching rows
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let fetch = apply_auth(
            Fetch::get(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .query(self.query.get_params().clone());

        let result = fetch.execute::<Vec<T>>().await?;
        Ok(result)
    }

    /// Execute the query and return the first row, if any
    pub async fn execute_one<T: DeserializeOwned>(&mut self) -> Result<Option<T>, Error> {
        self.limit(1);

        let results = self.execute::<T>().await?;
        Ok(results.into_iter().next())
    }
}

/// Builder for inserts
pub struct InsertBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    bearer: Option<String>,
}

impl<T: Serialize> InsertBuilder<T> {
    pub(crate) fn new(url: String, key: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            values,
            client,
            bearer: None,
        }
    }

    /// Attach the caller's identity to the request
    pub fn authed(&mut self, ctx: &AuthContext) -> &mut Self {
        self.bearer = Some(ctx.token().to_string());
        self
    }

    /// Execute the insert and return the created rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<Vec<R>, Error> {
        let fetch = apply_auth(
            Fetch::post(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .header("Prefer", "return=representation")
        .json(&self.values)?;

        let result = fetch.execute::<Vec<R>>().await?;
        Ok(result)
    }

    /// Execute the insert without returning the created rows
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = apply_auth(
            Fetch::post(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .header("Prefer", "return=minimal")
        .json(&self.values)?;

        fetch.execute_no_content().await
    }
}

/// Builder for updates
pub struct UpdateBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    query: QueryBuilder,
    bearer: Option<String>,
}

impl<T: Serialize> UpdateBuilder<T> {
    pub(crate) fn new(url: String, key: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            values,
            client,
            query: QueryBuilder::new(),
            bearer: None,
        }
    }

    /// Attach the caller's identity to the request
    pub fn authed(&mut self, ctx: &AuthContext) -> &mut Self {
        self.bearer = Some(ctx.token().to_string());
        self
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(&mut self, column: &str, value: V) -> &mut Self {
        let filter = format!("eq.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Execute the update and return the changed rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<Vec<R>, Error> {
        let fetch = apply_auth(
            Fetch::patch(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .header("Prefer", "return=representation")
        .query(self.query.get_params().clone())
        .json(&self.values)?;

        let result = fetch.execute::<Vec<R>>().await?;
        Ok(result)
    }

    /// Execute the update without returning the changed rows
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = apply_auth(
            Fetch::patch(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .header("Prefer", "return=minimal")
        .query(self.query.get_params().clone())
        .json(&self.values)?;

        fetch.execute_no_content().await
    }
}

/// Builder for key-addressed saves (insert-or-replace)
pub struct UpsertBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    on_conflict: Option<String>,
    bearer: Option<String>,
}

impl<T: Serialize> UpsertBuilder<T> {
    pub(crate) fn new(url: String, key: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            values,
            client,
            on_conflict: None,
            bearer: None,
        }
    }

    /// Attach the caller's identity to the request
    pub fn authed(&mut self, ctx: &AuthContext) -> &mut Self {
        self.bearer = Some(ctx.token().to_string());
        self
    }

    /// Specify the column to check for conflicts
    pub fn on_conflict(&mut self, column: &str) -> &mut Self {
        self.on_conflict = Some(column.to_string());
        self
    }

    /// Execute the upsert without returning the saved row
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let prefer = match &self.on_conflict {
            Some(_) => "resolution=merge-duplicates,return=minimal",
            None => "return=minimal",
        };

        let mut query = QueryBuilder::new();
        if let Some(conflict) = &self.on_conflict {
            query.add_param("on_conflict", conflict);
        }

        let fetch = apply_auth(
            Fetch::post(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .header("Prefer", prefer)
        .query(query.get_params().clone())
        .json(&self.values)?;

        fetch.execute_no_content().await
    }
}

/// Builder for deletes
pub struct DeleteBuilder {
    url: String,
    key: String,
    client: Client,
    query: QueryBuilder,
    bearer: Option<String>,
}

impl DeleteBuilder {
    pub(crate) fn new(url: String, key: String, client: Client) -> Self {
        Self {
            url,
            key,
            client,
            query: QueryBuilder::new(),
            bearer: None,
        }
    }

    /// Attach the caller's identity to the request
    pub fn authed(&mut self, ctx: &AuthContext) -> &mut Self {
        self.bearer = Some(ctx.token().to_string());
        self
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(&mut self, column: &str, value: V) -> &mut Self {
        let filter = format!("eq.{}", value.to_string());
        self.query.add_param(column, &filter);
        self
    }

    /// Execute the delete without returning the removed rows
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = apply_auth(
            Fetch::delete(&self.client, &self.url),
            &self.key,
            &self.bearer,
        )
        .header("Prefer", "return=minimal")
        .query(self.query.get_params().clone());

        fetch.execute_no_content().await
    }
}
