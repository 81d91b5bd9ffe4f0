use crate::domain::ports::{OrderStore, WebhookRegistry};
use crate::domain::transition::OrderUpdate;
use crate::domain::webhook::WebhookSubscription;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store holding the latest update per order.
///
/// Uses `Arc<RwLock<HashMap<String, OrderUpdate>>>` to allow shared concurrent access.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, OrderUpdate>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get(&self, order_id: &str) -> Result<Option<OrderUpdate>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }

    async fn put(&self, update: OrderUpdate) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(update.order_id.clone(), update);
        Ok(())
    }
}

/// A thread-safe in-memory webhook registry keyed by account.
///
/// Reads clone the tenant's list under a single read lock, so a dispatch
/// never observes a half-applied edit.
#[derive(Default, Clone)]
pub struct InMemoryWebhookRegistry {
    subscriptions: Arc<RwLock<HashMap<String, Vec<WebhookSubscription>>>>,
}

impl InMemoryWebhookRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a subscription (matched on account and subscription id).
    pub async fn register(&self, subscription: WebhookSubscription) {
        let mut subscriptions = self.subscriptions.write().await;
        let tenant = subscriptions
            .entry(subscription.account_id.clone())
            .or_default();
        tenant.retain(|s| s.subscription_id != subscription.subscription_id);
        tenant.push(subscription);
    }

    pub async fn remove(&self, account_id: &str, subscription_id: &str) -> bool {
        let mut subscriptions = self.subscriptions.write().await;
        let Some(tenant) = subscriptions.get_mut(account_id) else {
            return false;
        };
        let before = tenant.len();
        tenant.retain(|s| s.subscription_id != subscription_id);
        before != tenant.len()
    }
}

#[async_trait]
impl WebhookRegistry for InMemoryWebhookRegistry {
    async fn subscriptions_for(&self, account_id: &str) -> Result<Vec<WebhookSubscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.get(account_id).cloned().unwrap_or_default())
    }
}
