#![allow(dead_code)]

use async_trait::async_trait;
use order_lifecycle::domain::ports::{NotificationSender, WebhookClient};
use order_lifecycle::domain::product::BrandIdentity;
use order_lifecycle::domain::webhook::{
    HttpMethod, WebhookBody, WebhookResponse, WebhookSubscription,
};
use order_lifecycle::error::{LifecycleError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const CALLBACK_HEADER: [&str; 6] = [
    "order_id",
    "account_id",
    "customer_email",
    "product_type",
    "product_sub_type",
    "status",
];

/// Writes a callbacks CSV with the given rows under the standard header.
pub fn write_callbacks(path: &Path, rows: &[[&str; 6]]) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(CALLBACK_HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `count` "created" callbacks for distinct mutual fund orders.
pub fn generate_callbacks(path: &Path, count: usize) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(CALLBACK_HEADER)?;

    for i in 1..=count {
        let order_id = format!("O{i}");
        wtr.write_record([
            order_id.as_str(),
            "A1",
            "a@x.com",
            "MUTUAL_FUND",
            "SIP",
            "created",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// A POST subscription for account `A1` on a single event.
pub fn subscription(id: &str, url: &str, event: &str) -> WebhookSubscription {
    WebhookSubscription::new(id, "A1", url, HttpMethod::Post, [event])
}

pub fn write_subscriptions(
    path: &Path,
    subs: &[WebhookSubscription],
) -> std::result::Result<(), Error> {
    let mut file = File::create(path)?;
    file.write_all(&serde_json::to_vec(subs)?)?;
    Ok(())
}

/// A notification sender that remembers every send.
#[derive(Clone, Default)]
pub struct RecordingSender {
    pub sent: Arc<Mutex<Vec<(BrandIdentity, String, String)>>>,
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, brand: BrandIdentity, to_email: &str, path_name: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((brand, to_email.to_string(), path_name.to_string()));
        Ok(())
    }
}

/// A webhook client that records requests and refuses connections to chosen URLs.
#[derive(Clone, Default)]
pub struct RecordingClient {
    pub calls: Arc<Mutex<Vec<(HttpMethod, String, WebhookBody)>>>,
    pub unreachable: Arc<HashSet<String>>,
}

impl RecordingClient {
    pub fn with_unreachable(urls: &[&str]) -> Self {
        Self {
            unreachable: Arc::new(urls.iter().map(|u| u.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, url, _)| url.clone())
            .collect()
    }
}

#[async_trait]
impl WebhookClient for RecordingClient {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: &WebhookBody,
    ) -> Result<WebhookResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((method, url.to_string(), body.clone()));
        if self.unreachable.contains(url) {
            return Err(LifecycleError::Delivery {
                url: url.to_string(),
                reason: "connection refused".into(),
            });
        }
        Ok(WebhookResponse { status: 200 })
    }
}
