use super::event_bus::{EventBus, PublishReport};
use crate::domain::ports::OrderStoreBox;
use crate::domain::status::{CanonicalStatus, normalize};
use crate::domain::transition::{OrderUpdate, Transition};
use crate::error::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Turns raw upstream status callbacks into published transitions.
///
/// Callbacks for the same order are published one at a time in arrival
/// order; callbacks for different orders never wait on each other.
pub struct LifecycleEmitter {
    bus: Arc<EventBus>,
    orders: OrderStoreBox,
    order_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LifecycleEmitter {
    /// # Arguments
    ///
    /// * `bus` - The bus every accepted transition is published on.
    /// * `orders` - Read for the previous status of an order; never written.
    pub fn new(bus: Arc<EventBus>, orders: OrderStoreBox) -> Self {
        Self {
            bus,
            orders,
            order_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Classifies the callback and publishes the resulting transition.
    ///
    /// A status outside the synonym table is refused with
    /// `LifecycleError::UnknownStatus` and nothing is published.
    pub async fn accept(&self, update: &OrderUpdate) -> Result<PublishReport> {
        let new_status = normalize(&update.status).inspect_err(|e| {
            tracing::error!(
                order_id = %update.order_id,
                account_id = %update.account_id,
                "refusing to publish unclassifiable callback: {e}"
            )
        })?;

        let lock = self.order_lock(&update.order_id).await;
        let report = {
            let _guard = lock.lock().await;
            self.publish_in_order(update, new_status).await
        };
        self.release_order_lock(&update.order_id, lock).await;

        report
    }

    /// Runs with the order's lock held.
    async fn publish_in_order(
        &self,
        update: &OrderUpdate,
        new_status: CanonicalStatus,
    ) -> Result<PublishReport> {
        let previous_status = self.previous_status(&update.order_id).await?;
        flag_suspicious(update, previous_status, new_status);

        let transition = Transition {
            transition_id: Uuid::new_v4(),
            order_id: update.order_id.clone(),
            account_id: update.account_id.clone(),
            customer_email: update.customer_email.clone(),
            product_type: update.product_type,
            product_sub_type: update.product_sub_type,
            previous_status,
            new_status,
            occurred_at: Utc::now(),
        };
        tracing::info!(
            order_id = %transition.order_id,
            from = ?transition.previous_status,
            to = %transition.new_status,
            "publishing transition"
        );
        Ok(self.bus.publish(transition).await)
    }

    async fn previous_status(&self, order_id: &str) -> Result<Option<CanonicalStatus>> {
        let Some(stored) = self.orders.get(order_id).await? else {
            return Ok(None);
        };
        match normalize(&stored.status) {
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                tracing::warn!(
                    order_id,
                    "stored status not classifiable, treating as absent: {e}"
                );
                Ok(None)
            }
        }
    }

    async fn order_lock(&self, order_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.order_locks.lock().await;
        Arc::clone(locks.entry(order_id.to_string()).or_default())
    }

    async fn release_order_lock(&self, order_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.order_locks.lock().await;
        // One reference in the map plus ours: nobody else is queued on this order.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(order_id);
        }
    }
}

/// Legality of successors is not enforced, only logged.
fn flag_suspicious(
    update: &OrderUpdate,
    previous: Option<CanonicalStatus>,
    next: CanonicalStatus,
) {
    if let Some(previous) = previous
        && previous.is_terminal()
        && previous != next
    {
        tracing::warn!(
            order_id = %update.order_id,
            from = %previous,
            to = %next,
            "status follows a terminal status"
        );
    }
}
