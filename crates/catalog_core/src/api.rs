//! Outbound product listing request.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ApiErrorBody,
    protocol::{ProductRecord, ProductsQuery, ProductsResponse},
};
use tracing::debug;
use url::Url;

use crate::error::CatalogError;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_products(
        &self,
        query: &ProductsQuery,
        bearer_token: Option<&str>,
    ) -> Result<Vec<ProductRecord>, CatalogError>;
}

pub struct HttpCatalogApi {
    http: Client,
    products_url: Url,
}

impl HttpCatalogApi {
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            http,
            products_url: products_url(base_url)?,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }
}

fn products_url(base_url: &str) -> Result<Url, CatalogError> {
    let invalid = || CatalogError::InvalidBaseUrl(base_url.to_string());

    let mut base = Url::parse(base_url.trim()).map_err(|_| invalid())?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("products").map_err(|_| invalid())
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_products(
        &self,
        query: &ProductsQuery,
        bearer_token: Option<&str>,
    ) -> Result<Vec<ProductRecord>, CatalogError> {
        let mut request = self.http.get(self.products_url.clone()).query(query);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "product api responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = ApiErrorBody::parse(&body)
                .and_then(|body| body.message().map(str::to_string));
            return Err(CatalogError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await?;
        let parsed: ProductsResponse = serde_json::from_slice(&body)
            .map_err(|err| CatalogError::MalformedResponse(err.to_string()))?;
        Ok(parsed.products)
    }
}
