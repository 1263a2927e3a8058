//! REST client for a PostgREST-style product table

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Product, ProductApi, ProductDraft, ProductPatch};
use crate::config::Config;
use crate::error::{RemoteError, Result};

/// Path prefix of the REST interface under the store URL
const REST_PATH: &str = "rest/v1";

/// Product store client speaking the PostgREST dialect
pub struct RestProductClient {
    http: HttpClient,
    endpoint: String,
    api_key: Option<String>,
}

/// Error body returned by the store
#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: Option<String>,
    details: Option<String>,
}

impl RestProductClient {
    /// Create a client for `table` under the store at `api_url`.
    pub fn new(
        api_url: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/{}/{}", api_url.trim_end_matches('/'), REST_PATH, table),
            api_key,
        })
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_url = config.require_api_url()?;
        Self::new(
            api_url,
            &config.table,
            config.api_key.clone(),
            config.request_timeout(),
        )
    }

    /// Full URL of the product table
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start a request against the table with credentials attached
    fn request(&self, method: Method) -> RequestBuilder {
        let mut builder = self.http.request(method, &self.endpoint);
        if let Some(ref key) = self.api_key {
            builder = builder
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }
        builder
    }

    /// Send a request and decode the JSON body
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(RemoteError::from)?;
        let response = check_status(response).await?;
        let data = response.json::<T>().await.map_err(|e| {
            RemoteError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }

    /// Send a request whose body is ignored
    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await.map_err(RemoteError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Map a non-success status to a [`RemoteError`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| status.to_string());

    let err = match status {
        StatusCode::UNAUTHORIZED => RemoteError::Unauthorized,
        StatusCode::FORBIDDEN => RemoteError::Forbidden,
        StatusCode::NOT_FOUND => RemoteError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::BadRequest(message)
        }
        StatusCode::CONFLICT => RemoteError::Conflict(message),
        status if status.is_server_error() => RemoteError::ServerError(message),
        _ => RemoteError::InvalidResponse(format!("Unexpected status code: {}", status)),
    };
    Err(err.into())
}

/// Pull a readable message out of a store error body
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<StoreErrorBody>(body) {
        Ok(StoreErrorBody {
            message: Some(message),
            details,
        }) => Some(match details {
            Some(details) if !details.is_empty() => format!("{} ({})", message, details),
            _ => message,
        }),
        _ => Some(body.trim().to_string()),
    }
}

/// Take the single row of a `return=representation` response
fn single_row(rows: Vec<Product>, id: &str) -> Result<Product> {
    rows.into_iter()
        .next()
        .ok_or_else(|| RemoteError::NotFound(format!("Product {}", id)).into())
}

#[async_trait]
impl ProductApi for RestProductClient {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let builder = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.send_json(builder).await
    }

    async fn get_product(&self, id: &str) -> Result<Product> {
        let filter = format!("eq.{}", id);
        let builder = self
            .request(Method::GET)
            .query(&[("select", "*"), ("id", filter.as_str())]);
        let rows: Vec<Product> = self.send_json(builder).await?;
        single_row(rows, id)
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        draft.validate()?;

        let builder = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(draft);
        let rows: Vec<Product> = self.send_json(builder).await?;
        rows.into_iter().next().ok_or_else(|| {
            RemoteError::InvalidResponse("Store returned no row for insert".to_string()).into()
        })
    }

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> Result<Product> {
        patch.validate()?;

        let filter = format!("eq.{}", id);
        let builder = self
            .request(Method::PATCH)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch);
        let rows: Vec<Product> = self.send_json(builder).await?;
        single_row(rows, id)
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        let filter = format!("eq.{}", id);
        let builder = self
            .request(Method::DELETE)
            .query(&[("id", filter.as_str())]);
        self.send_empty(builder).await
    }
}
