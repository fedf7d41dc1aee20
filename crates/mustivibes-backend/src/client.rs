use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{BackendError, body_message};

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Admin auth, users, payments, coins, moderation.
    pub core_url: String,
    /// Notifications, dashboard, rooms, warning guidelines.
    pub social_url: String,
    pub timeout: Duration,
    /// Upper bound on in-flight requests during bulk actions.
    pub bulk_concurrency: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            core_url: "http://127.0.0.1:4050/api".into(),
            social_url: "http://127.0.0.1:4055/api".into(),
            timeout: Duration::from_secs(15),
            bulk_concurrency: 8,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Service {
    Core,
    Social,
}

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    core_url: String,
    social_url: String,
    pub(crate) bulk_concurrency: usize,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mustivibes-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            core_url: config.core_url.trim_end_matches('/').to_string(),
            social_url: config.social_url.trim_end_matches('/').to_string(),
            bulk_concurrency: config.bulk_concurrency.max(1),
        })
    }

    pub(crate) fn url(&self, service: Service, path: &str) -> String {
        let base = match service {
            Service::Core => &self.core_url,
            Service::Social => &self.social_url,
        };
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, service: Service, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(service, path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get(&self, service: Service, path: &str, token: &str) -> Result<Value, BackendError> {
        self.send(self.request(Method::GET, service, path, Some(token))).await
    }

    pub(crate) async fn delete(&self, service: Service, path: &str, token: &str) -> Result<Value, BackendError> {
        self.send(self.request(Method::DELETE, service, path, Some(token))).await
    }

    pub(crate) async fn put_empty(&self, service: Service, path: &str, token: &str) -> Result<Value, BackendError> {
        self.send(self.request(Method::PUT, service, path, Some(token))).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        service: Service,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Value, BackendError> {
        self.send(self.request(Method::POST, service, path, token).json(body)).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        service: Service,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<Value, BackendError> {
        self.send(self.request(Method::PUT, service, path, Some(token)).json(body)).await
    }

    /// Send, read the body as JSON (empty body is `null`), and turn error
    /// statuses and `success: false` into [`BackendError`].
    async fn send(&self, builder: RequestBuilder) -> Result<Value, BackendError> {
        let response = builder.send().await.map_err(|e| {
            warn!("backend request failed: {}", e);
            BackendError::Transport(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!("backend {} -> {}", url, status);

        if !status.is_success() {
            let message = body_message(&body).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("request failed").to_string()
            });
            warn!("backend {} returned {}: {}", url, status, message);
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body_message(&body).unwrap_or_else(|| "request was not accepted".into());
            warn!("backend {} rejected request: {}", url, message);
            return Err(BackendError::Rejected { message });
        }

        Ok(body)
    }
}
