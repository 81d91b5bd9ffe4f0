use super::product::{ProductSubType, ProductType};
use super::status::CanonicalStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An order's metadata together with a raw status as reported upstream.
///
/// This is both the shape of an inbound partner callback and what the order
/// store keeps as the latest known state of an order. The status is left
/// raw here; it only becomes a [`CanonicalStatus`] once normalized.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct OrderUpdate {
    pub order_id: String,
    pub account_id: String,
    pub customer_email: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub product_sub_type: Option<ProductSubType>,
    pub status: String,
}

/// An immutable record of an order moving to a new canonical status.
///
/// Built once by the emitter and shared read-only (behind an `Arc`) with every
/// reactor after publish.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Transition {
    pub transition_id: Uuid,
    pub order_id: String,
    pub account_id: String,
    pub customer_email: String,
    pub product_type: ProductType,
    pub product_sub_type: Option<ProductSubType>,
    pub previous_status: Option<CanonicalStatus>,
    pub new_status: CanonicalStatus,
    pub occurred_at: DateTime<Utc>,
}

impl Transition {
    pub fn new(
        order_id: impl Into<String>,
        account_id: impl Into<String>,
        customer_email: impl Into<String>,
        product_type: ProductType,
        new_status: CanonicalStatus,
    ) -> Self {
        Self {
            transition_id: Uuid::new_v4(),
            order_id: order_id.into(),
            account_id: account_id.into(),
            customer_email: customer_email.into(),
            product_type,
            product_sub_type: None,
            previous_status: None,
            new_status,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_sub_type(mut self, sub_type: ProductSubType) -> Self {
        self.product_sub_type = Some(sub_type);
        self
    }

    pub fn with_previous_status(mut self, previous: CanonicalStatus) -> Self {
        self.previous_status = Some(previous);
        self
    }

    /// The webhook event name this transition is delivered under.
    pub fn event_name(&self) -> &'static str {
        self.new_status.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_update_deserialization_allows_missing_sub_type() {
        let csv = "order_id, account_id, customer_email, product_type, product_sub_type, status\n\
                   O1, A1, a@x.com, LISTED_BOND, , created";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());
        let mut iter = reader.deserialize();

        let result: OrderUpdate = iter
            .next()
            .unwrap()
            .expect("Failed to deserialize order update");

        assert_eq!(result.product_type, ProductType::ListedBond);
        assert_eq!(result.product_sub_type, None);
        assert_eq!(result.status, "created");
    }

    #[test]
    fn test_transition_builder() {
        let t = Transition::new(
            "O1",
            "A1",
            "a@x.com",
            ProductType::MutualFund,
            CanonicalStatus::OrderProcessed,
        )
        .with_sub_type(ProductSubType::Sip)
        .with_previous_status(CanonicalStatus::OrderCreated);

        assert_eq!(t.product_sub_type, Some(ProductSubType::Sip));
        assert_eq!(t.previous_status, Some(CanonicalStatus::OrderCreated));
        assert_eq!(t.event_name(), "ORDER_PROCESSED");
    }

    #[test]
    fn test_transition_ids_are_unique() {
        let created = || {
            Transition::new("O1", "A1", "a@x.com", ProductType::Mld, CanonicalStatus::OrderCreated)
        };
        let a = created();
        let b = created();
        assert_ne!(a.transition_id, b.transition_id);
    }
}
