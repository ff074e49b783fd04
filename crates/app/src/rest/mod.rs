//! Hosted store client
//!
//! Talks PostgREST: tables under `/rest/v1/{table}`, stored procedures under
//! `/rest/v1/rpc/{name}`. Every request carries the anon key both as `apikey`
//! and as a bearer token.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::domain::StoreError;

mod catalog;
mod customers;
mod inventory;
mod orders;
mod payments;
mod reports;
pub(crate) mod rows;

/// PostgREST client implementing every store service.
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    api_key: String,
    http: Client,
}

/// A PostgREST query string pair, e.g. `("id", "eq.{uuid}")`.
pub(crate) type Filter = (&'static str, String);

impl RestStore {
    /// Client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] when the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{name}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// `GET /rest/v1/{table}` with `select` and filters.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, StoreError> {
        debug!(table, select, "select");

        let response = self
            .authorize(self.http.get(self.table_url(table)))
            .query(&[("select", select)])
            .query(filters)
            .send()
            .await?;

        Ok(check(response, table).await?.json().await?)
    }

    /// `POST /rest/v1/{table}`, returning the inserted rows.
    pub(crate) async fn insert<B, T>(&self, table: &str, rows: &B) -> Result<Vec<T>, StoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(table, "insert");

        let response = self
            .authorize(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;

        Ok(check(response, table).await?.json().await?)
    }

    /// `PATCH /rest/v1/{table}` on the filtered rows, returning them.
    pub(crate) async fn update<B, T>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &B,
    ) -> Result<Vec<T>, StoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(table, ?filters, "update");

        let response = self
            .authorize(self.http.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(filters)
            .json(patch)
            .send()
            .await?;

        Ok(check(response, table).await?.json().await?)
    }

    /// `POST /rest/v1/rpc/{name}`.
    pub(crate) async fn rpc<B, T>(&self, name: &str, params: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(rpc = name, "call");

        let response = self
            .authorize(self.http.post(self.rpc_url(name)))
            .json(params)
            .send()
            .await?;

        Ok(check(response, name).await?.json().await?)
    }

    /// An RPC without a meaningful result body.
    pub(crate) async fn rpc_unit<B>(&self, name: &str, params: &B) -> Result<(), StoreError>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(rpc = name, "call");

        let response = self
            .authorize(self.http.post(self.rpc_url(name)))
            .json(params)
            .send()
            .await?;

        check(response, name).await?;

        Ok(())
    }
}

async fn check(response: Response, what: &str) -> Result<Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    debug!(what, %status, "store rejected request");

    Err(StoreError::Rejected {
        status: status.as_u16(),
        message: text,
    })
}

/// The only row of a single-row response.
pub(crate) fn single<T>(rows: Vec<T>, what: &str) -> Result<T, StoreError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(what.to_string()))
}

pub(crate) fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

pub(crate) fn in_list<T: std::fmt::Display>(values: &[T]) -> String {
    let joined = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    format!("in.({joined})")
}
