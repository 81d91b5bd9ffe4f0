use crate::domain::ports::{NotificationSenderBox, Reactor};
use crate::domain::product::{BrandIdentity, ProductSubType, ProductType};
use crate::domain::transition::Transition;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Where a customer notification should point and under which brand it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path_name: String,
    pub brand: BrandIdentity,
}

/// Pure mapping from (product type, sub-type) to brand and deep link.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationRouter;

impl NotificationRouter {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the route for a transition. Never fails: anything without a
    /// specific rule falls back to the partner-branded payment page.
    pub fn route(&self, transition: &Transition) -> Route {
        let base = format!("/payments/{}", transition.order_id);

        match transition.product_type {
            ProductType::Mld => Route {
                path_name: format!("{base}/market-linked-debentures"),
                brand: BrandIdentity::Secondary,
            },
            ProductType::UnlistedEquity => Route {
                path_name: format!("{base}/unlisted-equities"),
                brand: BrandIdentity::Partner,
            },
            ProductType::ListedBond => Route {
                path_name: format!("{base}/listed-bonds"),
                brand: BrandIdentity::Secondary,
            },
            ProductType::MutualFund => {
                let path_name = match mutual_fund_suffix(transition.product_sub_type) {
                    Some(suffix) => format!("{base}{suffix}"),
                    // Known gap: unmapped fund sub-types keep the default page.
                    None => base,
                };
                Route {
                    path_name,
                    brand: BrandIdentity::Partner,
                }
            }
            ProductType::FixedDeposit => Route {
                path_name: base,
                brand: BrandIdentity::Partner,
            },
        }
    }
}

fn mutual_fund_suffix(sub_type: Option<ProductSubType>) -> Option<&'static str> {
    match sub_type? {
        ProductSubType::Lumpsum | ProductSubType::Sip => Some("/mutual-funds/transaction"),
        ProductSubType::Redemption | ProductSubType::Swp => Some("/redeem"),
        ProductSubType::SwitchIn
        | ProductSubType::SwitchOut
        | ProductSubType::StpIn
        | ProductSubType::StpOut => Some("/switch"),
    }
}

/// Routes each transition and hands the result to the notification sender.
pub struct NotificationReactor {
    router: NotificationRouter,
    sender: NotificationSenderBox,
}

impl NotificationReactor {
    pub fn new(sender: NotificationSenderBox) -> Self {
        Self {
            router: NotificationRouter::new(),
            sender,
        }
    }
}

#[async_trait]
impl Reactor for NotificationReactor {
    fn name(&self) -> &str {
        "notification"
    }

    async fn handle(&self, transition: Arc<Transition>) -> Result<()> {
        let route = self.router.route(&transition);
        tracing::debug!(
            order_id = %transition.order_id,
            brand = %route.brand,
            path = %route.path_name,
            "notification routed"
        );
        self.sender
            .send(route.brand, &transition.customer_email, &route.path_name)
            .await
    }
}
