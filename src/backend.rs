//! Thin typed client for the hosted backend's REST interface.
//!
//! Every table call goes to `{url}/rest/v1/{table}` and every stored
//! procedure to `{url}/rest/v1/rpc/{function}`. Filters, ordering and limits
//! are expressed as PostgREST query parameters built by [`TableQuery`].

use std::time::Duration;

use reqwest::header::{CONTENT_RANGE, HeaderMap};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::models::config::BackendConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult, from_backend_code};

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_COUNT: &str = "count=exact";

/// Query parameters of a single table request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableQuery {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<usize>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns (and embedded relations) to return.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive substring match on any of `columns`.
    ///
    /// Characters that delimit PostgREST logic trees are removed from the term.
    pub fn ilike_any(mut self, columns: &[&str], term: &str) -> Self {
        let term: String = term
            .trim()
            .chars()
            .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%'))
            .collect();
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        let conditions = columns
            .iter()
            .map(|column| format!("{column}.ilike.*{term}*"))
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push(("or".to_string(), format!("({conditions})")));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.desc"));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.asc"));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in the order they are sent.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Full request URL for `table` under the REST root `base`.
    pub fn to_url(&self, base: &str, table: &str) -> RepositoryResult<Url> {
        let mut url = Url::parse(&format!("{}/{table}", base.trim_end_matches('/')))
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid backend URL: {e}")))?;
        let pairs = self.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Maps a failed response to a repository error using the PostgREST error
/// body when it can be decoded.
pub fn map_error_response(status: StatusCode, body: &[u8]) -> RepositoryError {
    match serde_json::from_slice::<BackendErrorBody>(body) {
        Ok(BackendErrorBody { code, message }) => {
            let message = message.unwrap_or_else(|| status.to_string());
            match code {
                Some(code) => from_backend_code(&code, message),
                None if status == StatusCode::NOT_FOUND => RepositoryError::NotFound,
                None => RepositoryError::BackendError(message),
            }
        }
        Err(_) if status == StatusCode::NOT_FOUND => RepositoryError::NotFound,
        Err(_) => RepositoryError::Unexpected(format!(
            "Backend responded with {status}: {}",
            String::from_utf8_lossy(body)
        )),
    }
}

/// Reads the total from a `Content-Range` header such as `0-9/42` or `*/42`.
pub fn parse_content_range(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

/// Shared handle to the backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    rest_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> RepositoryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, builder: RequestBuilder) -> RepositoryResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await?;
        Err(map_error_response(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            RepositoryError::Unexpected(format!("Failed to decode backend response: {e}"))
        })
    }

    /// Reads every row matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &TableQuery,
    ) -> RepositoryResult<Vec<T>> {
        let url = query.to_url(&self.rest_url, table)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::decode(response).await
    }

    /// Reads the first row matching `query`.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &TableQuery,
    ) -> RepositoryResult<Option<T>> {
        let query = query.clone().limit(1);
        let rows: Vec<T> = self.select(table, &query).await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts `rows` and returns the stored representation.
    pub async fn insert<B, T>(&self, table: &str, rows: &B, select: &str) -> RepositoryResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = TableQuery::new().select(select).to_url(&self.rest_url, table)?;
        let builder = self
            .request(Method::POST, url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(rows);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    /// Applies `patch` to rows matching `query` and returns them.
    pub async fn update<B, T>(
        &self,
        table: &str,
        query: &TableQuery,
        patch: &B,
    ) -> RepositoryResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = query.to_url(&self.rest_url, table)?;
        let builder = self
            .request(Method::PATCH, url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(patch);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    /// Deletes rows matching `query`.
    pub async fn delete(&self, table: &str, query: &TableQuery) -> RepositoryResult<()> {
        let url = query.to_url(&self.rest_url, table)?;
        let builder = self
            .request(Method::DELETE, url)
            .header("Prefer", PREFER_MINIMAL);
        self.send(builder).await?;
        Ok(())
    }

    /// Calls the stored procedure `function` with named `args`.
    pub async fn rpc<A, T>(&self, function: &str, args: &A) -> RepositoryResult<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = TableQuery::new().to_url(&self.rest_url, &format!("rpc/{function}"))?;
        let response = self
            .send(self.request(Method::POST, url).json(args))
            .await?;
        Self::decode(response).await
    }

    /// Exact number of rows matching `query`, without transferring them.
    pub async fn count(&self, table: &str, query: &TableQuery) -> RepositoryResult<usize> {
        let url = query.to_url(&self.rest_url, table)?;
        let builder = self
            .request(Method::HEAD, url)
            .header("Prefer", PREFER_COUNT);
        let response = self.send(builder).await?;
        content_range_total(response.headers())
    }
}

fn content_range_total(headers: &HeaderMap) -> RepositoryResult<usize> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_range)
        .ok_or_else(|| RepositoryError::Unexpected("Missing row count in response".to_string()))
}
