use async_trait::async_trait;
use gloo_net::http::Request;
use web_sys::RequestCredentials;

use crate::error::FetchError;
use crate::fetch::{FetchRequest, FetchResponse, Transport};

/// `fetch()` through gloo-net.
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut builder = Request::get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if request.include_credentials {
            builder = builder.credentials(RequestCredentials::Include);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(FetchResponse { status, body })
    }
}
