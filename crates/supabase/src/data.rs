//! Client for the platform's row store.
//!
//! A thin query builder over the REST row API: filtered, sorted, paginated
//! reads plus keyed insert/update/delete against named relations. Values
//! are typed at the edges via serde; the builder itself only assembles
//! request parameters.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use crate::{SupabaseConfig, SupabaseError, error_for_response};

/// Client for the platform data endpoints.
#[derive(Clone)]
pub struct DataClient {
    inner: Arc<DataClientInner>,
}

struct DataClientInner {
    client: reqwest::Client,
    base: String,
    api_key: String,
}

impl DataClient {
    /// Create a new data client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(DataClientInner {
                client: reqwest::Client::new(),
                base: format!("{}/rest/v1", config.url),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Start a read query against `table`.
    #[must_use]
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder {
            inner: Arc::clone(&self.inner),
            table: table.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
            bearer: None,
        }
    }

    fn write_request(
        &self,
        method: reqwest::Method,
        table: &str,
        bearer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let token = bearer.unwrap_or(&self.inner.api_key);
        self.inner
            .client
            .request(method, format!("{}/{table}", self.inner.base))
            .header("apikey", &self.inner.api_key)
            .bearer_auth(token)
    }

    /// Insert a row and return the stored representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the row (constraints,
    /// row-level rules) or the response cannot be parsed.
    #[instrument(skip(self, row, bearer), fields(table = %table))]
    pub async fn insert<T, R>(
        &self,
        table: &str,
        row: &T,
        bearer: Option<&str>,
    ) -> Result<R, SupabaseError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .write_request(reqwest::Method::POST, table, bearer)
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(row)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Update the row with the given `id` and return the stored
    /// representation.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] when no row matches, or an API
    /// error when the service rejects the change.
    #[instrument(skip(self, patch, bearer), fields(table = %table, id = %id))]
    pub async fn update<T, R>(
        &self,
        table: &str,
        id: Uuid,
        patch: &T,
        bearer: Option<&str>,
    ) -> Result<R, SupabaseError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .write_request(reqwest::Method::PATCH, table, bearer)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .header("Accept", "application/vnd.pgrst.object+json")
            .json(patch)
            .send()
            .await?;

        match response.status().as_u16() {
            // The object representation answers 406 when zero rows matched.
            406 => Err(SupabaseError::NotFound(format!("{table} {id}"))),
            s if (200..300).contains(&s) => Ok(response.json().await?),
            _ => Err(error_for_response(response).await),
        }
    }

    /// Delete the row with the given `id`.
    ///
    /// Deleting an absent row is a success - the end state is the same.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the delete.
    #[instrument(skip(self, bearer), fields(table = %table, id = %id))]
    pub async fn delete(
        &self,
        table: &str,
        id: Uuid,
        bearer: Option<&str>,
    ) -> Result<(), SupabaseError> {
        let response = self
            .write_request(reqwest::Method::DELETE, table, bearer)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(())
    }
}

/// Builder for filtered/sorted/paginated reads.
#[must_use]
pub struct QueryBuilder {
    inner: Arc<DataClientInner>,
    table: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    bearer: Option<String>,
}

impl QueryBuilder {
    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Keep rows where `column` contains `needle`, case-insensitively.
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.*{needle}*")));
        self
    }

    /// Sort ascending by `column`.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.asc"));
        self
    }

    /// Sort descending by `column`.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    /// Return at most `count` rows starting at `offset` (zero-based).
    pub const fn page(mut self, offset: u64, count: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(count);
        self
    }

    /// Run the query under `access_token` instead of the client's API key,
    /// so the platform applies that user's row-level rules.
    pub fn bearer(mut self, access_token: &str) -> Self {
        self.bearer = Some(access_token.to_string());
        self
    }

    /// The query string this builder will send.
    fn query_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> =
            vec![("select".to_string(), "*".to_string())];
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let token = self.bearer.as_deref().unwrap_or(&self.inner.api_key);
        self.inner
            .client
            .get(format!("{}/{}", self.inner.base, self.table))
            .header("apikey", &self.inner.api_key)
            .bearer_auth(token)
            .query(&self.query_params())
    }

    /// Fetch all matching rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or rows cannot be parsed.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, SupabaseError> {
        let response = self.request().send().await?;
        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Fetch exactly one matching row.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] when no row matches.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, SupabaseError> {
        let table = self.table.clone();
        let response = self
            .request()
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await?;

        match response.status().as_u16() {
            406 => Err(SupabaseError::NotFound(table)),
            s if (200..300).contains(&s) => Ok(response.json().await?),
            _ => Err(error_for_response(response).await),
        }
    }

    /// Fetch matching rows together with the exact total match count
    /// (ignoring pagination), for building pagers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or rows cannot be parsed.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn fetch_with_count<T: DeserializeOwned>(
        self,
    ) -> Result<(Vec<T>, u64), SupabaseError> {
        let response = self
            .request()
            .header("Prefer", "count=exact")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        // Content-Range: "0-24/3573" (or "*/0" for an empty result).
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .unwrap_or(0);

        let rows = response.json().await?;
        Ok((rows, total))
    }
}

/// Parse the total from a `Content-Range` header value.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> DataClient {
        DataClient::new(&SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            api_key: SecretString::from("test-key"),
        })
    }

    #[test]
    fn test_select_star_is_always_first() {
        let params = client().from("products").query_params();
        assert_eq!(params[0], ("select".to_string(), "*".to_string()));
    }

    #[test]
    fn test_catalog_query_params() {
        let params = client()
            .from("products")
            .eq("is_active", "true")
            .order_desc("created_at")
            .query_params();

        assert!(params.contains(&("is_active".to_string(), "eq.true".to_string())));
        assert!(params.contains(&("order".to_string(), "created_at.desc".to_string())));
    }

    #[test]
    fn test_pagination_params() {
        let params = client()
            .from("orders")
            .order_desc("created_at")
            .page(50, 25)
            .query_params();

        assert!(params.contains(&("limit".to_string(), "25".to_string())));
        assert!(params.contains(&("offset".to_string(), "50".to_string())));
    }

    #[test]
    fn test_ilike_wraps_needle_in_wildcards() {
        let params = client().from("products").ilike("name", "lavender").query_params();
        assert!(params.contains(&("name".to_string(), "ilike.*lavender*".to_string())));
    }

    #[test]
    fn test_keyed_filter_formatting() {
        let id = Uuid::new_v4();
        let params = client().from("profiles").eq("id", id).query_params();
        assert!(params.contains(&("id".to_string(), format!("eq.{id}"))));
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
