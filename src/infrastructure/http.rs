use crate::domain::ports::WebhookClient;
use crate::domain::webhook::{HttpMethod, WebhookBody, WebhookResponse};
use crate::error::{LifecycleError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

/// Webhook delivery over `reqwest` with a bounded per-request timeout.
#[derive(Clone)]
pub struct ReqwestWebhookClient {
    client: Client,
}

impl ReqwestWebhookClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LifecycleError::InternalError(Box::new(e)))?;
        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl WebhookClient for ReqwestWebhookClient {
    async fn request(
        &self,
        http_method: HttpMethod,
        url: &str,
        body: &WebhookBody,
    ) -> Result<WebhookResponse> {
        let response = self
            .client
            .request(method(http_method), url)
            .json(body)
            .send()
            .await
            .map_err(|e| LifecycleError::Delivery {
                url: url.to_string(),
                reason: if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        Ok(WebhookResponse {
            status: response.status().as_u16(),
        })
    }
}
