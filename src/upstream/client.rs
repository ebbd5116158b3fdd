//! HTTP client for the image processor and metadata source.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

use crate::config::schema::{TimeoutConfig, UpstreamConfig};
use crate::http::request::X_REQUEST_ID;
use crate::iiif::ImageInfo;

/// Metadata documents are tiny; anything larger is malformed.
const METADATA_BODY_LIMIT: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read upstream body: {0}")]
    Body(#[from] axum::Error),

    #[error("malformed metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Outcome of a metadata lookup.
#[derive(Debug)]
pub enum MetadataLookup {
    Found(ImageInfo),
    /// Non-success response, forwarded to the client.
    PassThrough(Response<Incoming>),
}

/// Shared client for both upstream calls.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    address: String,
    metadata_address: String,
    metadata_query: String,
}

impl UpstreamClient {
    pub fn from_config(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            address: upstream.address.clone(),
            metadata_address: upstream.metadata_address().to_string(),
            metadata_query: upstream.metadata_query.clone(),
        }
    }

    /// Forward an image request to the processor.
    pub async fn fetch_image(
        &self,
        method: &Method,
        backend_uri: &str,
        request_id: &str,
    ) -> Result<Response<Incoming>, UpstreamError> {
        let uri = format!("http://{}{}", self.address, backend_uri);
        self.send(method.clone(), &uri, request_id).await
    }

    /// Ask the metadata source for the object's dimensions.
    pub async fn fetch_metadata(
        &self,
        backend_path: &str,
        request_id: &str,
    ) -> Result<MetadataLookup, UpstreamError> {
        let uri = if self.metadata_query.is_empty() {
            format!("http://{}{}", self.metadata_address, backend_path)
        } else {
            format!("http://{}{}?{}", self.metadata_address, backend_path, self.metadata_query)
        };

        let response = self.send(Method::GET, &uri, request_id).await?;
        if !response.status().is_success() {
            return Ok(MetadataLookup::PassThrough(response));
        }

        let body = axum::body::to_bytes(Body::new(response.into_body()), METADATA_BODY_LIMIT).await?;
        let info: ImageInfo = serde_json::from_slice(&body)?;
        Ok(MetadataLookup::Found(info))
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        request_id: &str,
    ) -> Result<Response<Incoming>, UpstreamError> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(X_REQUEST_ID, request_id)
            .body(Body::empty())?;

        tracing::debug!(request_id = %request_id, uri = %uri, "Forwarding upstream");
        Ok(self.client.request(request).await?)
    }
}
