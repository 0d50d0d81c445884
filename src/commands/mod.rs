//! REST Command Wrappers
//!
//! Frontend bindings to the entity-broker REST backend.

mod item;

use async_trait::async_trait;
use reqwest::Method;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};

pub use item::*;

/// One request to the backend, built before it is sent so workflows can
/// hand it to whichever transport the caller owns
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Form-encoded body fields
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), form: Vec::new() }
    }

    pub fn field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push((name.to_string(), value.into()));
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.form.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Request/response transport to the backend
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse>;
}

/// `Transport` over HTTP via reqwest
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    origin: String,
}

impl RestClient {
    pub fn new(config: &Config) -> Self {
        let origin = if config.origin.is_empty() {
            web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default()
        } else {
            config.origin.clone()
        };
        Self { client: reqwest::Client::new(), origin }
    }
}

#[async_trait(?Send)]
impl Transport for RestClient {
    async fn send(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let url = format!("{}{}", self.origin, request.path);
        log::debug!("{} {} {:?}", request.method, url, request.form);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        let response = builder.send().await.map_err(|e| ApiError::Request {
            path: request.path.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Decode {
            path: request.path.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            log::warn!("{} {} -> {}", request.method, request.path, status);
            return Err(ApiError::Status { path: request.path.clone(), status: status.as_u16() });
        }
        Ok(ApiResponse { status: status.as_u16(), body })
    }
}
