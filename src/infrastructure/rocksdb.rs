use crate::domain::ports::{OrderStore, WebhookRegistry};
use crate::domain::transition::OrderUpdate;
use crate::domain::webhook::WebhookSubscription;
use crate::error::{LifecycleError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing the latest update of each order.
pub const CF_ORDERS: &str = "orders";
/// Column Family for storing webhook subscriptions, keyed `{account_id}/{subscription_id}`.
pub const CF_SUBSCRIPTIONS: &str = "subscriptions";

/// A persistent store implementation using RocksDB.
///
/// Backs both the order store and the webhook registry using separate
/// Column Families. Registry reads go through a RocksDB snapshot, so each
/// `subscriptions_for` call sees one consistent view of the tenant.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("orders" and "subscriptions") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let cf_subscriptions = ColumnFamilyDescriptor::new(CF_SUBSCRIPTIONS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders, cf_subscriptions])?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Adds or replaces a subscription.
    pub fn register(&self, subscription: &WebhookSubscription) -> Result<()> {
        let cf = self.cf(CF_SUBSCRIPTIONS)?;
        let key = subscription_key(&subscription.account_id, &subscription.subscription_id);
        let value = serde_json::to_vec(subscription)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    pub fn remove(&self, account_id: &str, subscription_id: &str) -> Result<()> {
        let cf = self.cf(CF_SUBSCRIPTIONS)?;
        self.db.delete_cf(cf, subscription_key(account_id, subscription_id))?;
        Ok(())
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LifecycleError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }
}

fn subscription_key(account_id: &str, subscription_id: &str) -> Vec<u8> {
    format!("{account_id}/{subscription_id}").into_bytes()
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn get(&self, order_id: &str) -> Result<Option<OrderUpdate>> {
        let cf = self.cf(CF_ORDERS)?;
        match self.db.get_cf(cf, order_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, update: OrderUpdate) -> Result<()> {
        let cf = self.cf(CF_ORDERS)?;
        let value = serde_json::to_vec(&update)?;
        self.db.put_cf(cf, update.order_id.as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl WebhookRegistry for RocksDBStore {
    async fn subscriptions_for(&self, account_id: &str) -> Result<Vec<WebhookSubscription>> {
        let cf = self.cf(CF_SUBSCRIPTIONS)?;
        let prefix = format!("{account_id}/").into_bytes();

        let snapshot = self.db.snapshot();
        let iter = snapshot.iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut subscriptions = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let subscription: WebhookSubscription = serde_json::from_slice(&value)?;
            // "A1/x/s1" also starts with "A1/"; it belongs to account "A1/x".
            if subscription.account_id == account_id {
                subscriptions.push(subscription);
            }
        }

        Ok(subscriptions)
    }
}
