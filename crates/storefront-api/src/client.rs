use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use storefront_core::config::ApiConfig;
use storefront_core::error::{Error, Result};
use storefront_core::facets::SearchParams;
use storefront_core::traits::SearchApi;
use storefront_core::types::{FacetCounts, Product, ProductDetail, Suggestion};

/// Read-only client for the `/products/*` endpoints.
#[derive(Clone, Debug)]
pub struct HttpSearchApi {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpSearchApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::InvalidConfig(format!("http client: {e}")))?;
        Self::with_client(http, &config.base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::InvalidConfig(format!("api.base_url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!("api.base_url '{base_url}' cannot carry a path")));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig(format!("api.base_url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T, Q>(&self, what: &str, url: Url, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        tracing::debug!(%url, "GET {what}");
        let resp = self.http.get(url).query(query).send().await.map_err(|e| transport(what, e))?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status { status: status.as_u16(), body });
        }
        resp.json::<T>().await.map_err(|e| transport(what, e))
    }
}

fn transport(what: &str, err: reqwest::Error) -> Error {
    if err.is_decode() {
        Error::Decode(format!("{what}: {err}"))
    } else {
        Error::Transport(format!("{what}: {err}"))
    }
}

#[async_trait]
impl SearchApi for HttpSearchApi {
    async fn suggest(&self, prefix: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let url = self.endpoint(&["products", "suggest"])?;
        let limit = limit.to_string();
        self.get_json("suggestions", url, &[("prefix", prefix), ("limit", limit.as_str())]).await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Product>> {
        let url = self.endpoint(&["products", "search"])?;
        self.get_json("search results", url, &params.to_query_pairs()).await
    }

    async fn facets(&self, params: &SearchParams) -> Result<FacetCounts> {
        let url = self.endpoint(&["products", "facets"])?;
        self.get_json("facet counts", url, &params.to_query_pairs()).await
    }

    async fn product(&self, id: &str) -> Result<ProductDetail> {
        let url = self.endpoint(&["products", "id", id])?;
        let none: [(&str, &str); 0] = [];
        self.get_json(&format!("product {id}"), url, &none).await
    }
}
