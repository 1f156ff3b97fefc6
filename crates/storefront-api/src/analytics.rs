//! Behavioral-analytics collector sink.
//!
//! Posts each event to `{endpoint}/_application/analytics/{collection}/event/{type}`
//! on a detached task, so `track` returns before the request is even sent.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;

use storefront_core::analytics::{AnalyticsContext, AnalyticsEvent};
use storefront_core::config::AnalyticsConfig;
use storefront_core::error::{Error, Result};
use storefront_core::traits::AnalyticsSink;

#[derive(Clone, Debug)]
pub struct CollectorSink {
    http: reqwest::Client,
    endpoint: Url,
    collection: String,
    headers: HeaderMap,
    ctx: AnalyticsContext,
}

impl CollectorSink {
    pub fn new(config: &AnalyticsConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::InvalidConfig("analytics.endpoint is not set".into()))?;
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::InvalidConfig(format!("analytics.endpoint '{endpoint}': {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref() {
            let value = HeaderValue::from_str(&format!("ApiKey {key}"))
                .map_err(|e| Error::InvalidConfig(format!("analytics.api_key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            collection: config.collection.clone(),
            headers,
            ctx: config.context(),
        })
    }

    pub fn event_url(&self, event: &AnalyticsEvent) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig(format!("analytics.endpoint '{}' cannot carry a path", self.endpoint)))?
            .pop_if_empty()
            .extend(["_application", "analytics", self.collection.as_str(), "event", event.event_type()]);
        Ok(url)
    }
}

impl AnalyticsSink for CollectorSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Operation(format!("no async runtime for analytics: {e}")))?;
        let url = self.event_url(event)?;
        let request = self.http.post(url).headers(self.headers.clone()).json(&event.payload(&self.ctx));
        let event_type = event.event_type();
        runtime.spawn(async move {
            match request.send().await {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::debug!(event = event_type, status = %resp.status(), "collector rejected event");
                }
                Ok(_) => {}
                Err(err) => tracing::debug!(event = event_type, error = %err, "collector unreachable"),
            }
        });
        Ok(())
    }
}
