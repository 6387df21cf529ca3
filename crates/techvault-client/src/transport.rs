//! reqwest implementation of [`Transport`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use techvault_core::error::{VaultError, VaultResult};
use techvault_core::http::{HttpRequest, HttpResponse, Method, Transport};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;

const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Sends [`HttpRequest`]s to the configured API base URL.
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: String,
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> VaultResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(VaultError::Config("base_url must not be empty".into()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("techvault/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::from)?;

        info!(base_url = %base_url, "Configured TechVault transport");

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> VaultResult<HttpResponse> {
        let mut builder = self
            .http
            .request(to_reqwest(request.method), self.url(&request.path))
            .header(REQUEST_ID_HEADER, request.request_id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ClientError::from)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(ClientError::from)?.to_vec();

        debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            status,
            bytes = body.len(),
            "Received response"
        );

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
