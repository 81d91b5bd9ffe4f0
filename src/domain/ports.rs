use super::product::BrandIdentity;
use super::transition::{OrderUpdate, Transition};
use super::webhook::{HttpMethod, WebhookBody, WebhookResponse, WebhookSubscription};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Latest known state of each order. The dispatch core only reads from it.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, order_id: &str) -> Result<Option<OrderUpdate>>;
    async fn put(&self, update: OrderUpdate) -> Result<()>;
}

/// Tenant-owned webhook subscriptions.
///
/// Each call must return one consistent snapshot for the account.
#[async_trait]
pub trait WebhookRegistry: Send + Sync {
    async fn subscriptions_for(&self, account_id: &str) -> Result<Vec<WebhookSubscription>>;
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, brand: BrandIdentity, to_email: &str, path_name: &str) -> Result<()>;
}

/// Outbound HTTP used for webhook delivery.
///
/// Any response that arrives is returned as `Ok`, whatever its status code;
/// `Err` is for transport-level failures.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: &WebhookBody,
    ) -> Result<WebhookResponse>;
}

/// An independent unit of logic invoked once per published transition.
#[async_trait]
pub trait Reactor: Send + Sync {
    fn name(&self) -> &str;
    async fn handle(&self, transition: Arc<Transition>) -> Result<()>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type WebhookRegistryBox = Box<dyn WebhookRegistry>;
pub type NotificationSenderBox = Box<dyn NotificationSender>;
pub type WebhookClientRef = Arc<dyn WebhookClient>;
pub type ReactorBox = Box<dyn Reactor>;
