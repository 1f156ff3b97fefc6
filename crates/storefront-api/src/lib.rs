//! storefront-api
//!
//! HTTP side of the client: the `reqwest`-backed catalog API and the
//! behavioral-analytics collector sink.
pub mod analytics;
pub mod client;

pub use analytics::CollectorSink;
pub use client::HttpSearchApi;
