use crate::error::LifecycleError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// The closed set of lifecycle states an order or payment can be in.
///
/// The serialized form (`SCREAMING_SNAKE_CASE`) is also the webhook event name
/// tenants subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalStatus {
    PaymentLinkSent,
    PaymentPending,
    PaymentSuccess,
    PaymentFailed,
    PaymentExpired,
    PaymentRefunded,
    DigioSignPending,
    DigioSignSuccess,
    DigioSignFailed,
    DigioSignExpired,
    KycPending,
    KycVerified,
    MandateRegistered,
    OrderCreated,
    OrderPending,
    OrderApproved,
    OrderPlaced,
    OrderProcessing,
    OrderProcessed,
    OrderAllotted,
    OrderSettled,
    OrderRejected,
    OrderCancelled,
    OrderFailed,
    OrderExpired,
    OrderLimitReached,
    OrderRefundInitiated,
    OrderRefunded,
}

impl CanonicalStatus {
    pub const ALL: [CanonicalStatus; 28] = [
        CanonicalStatus::PaymentLinkSent,
        CanonicalStatus::PaymentPending,
        CanonicalStatus::PaymentSuccess,
        CanonicalStatus::PaymentFailed,
        CanonicalStatus::PaymentExpired,
        CanonicalStatus::PaymentRefunded,
        CanonicalStatus::DigioSignPending,
        CanonicalStatus::DigioSignSuccess,
        CanonicalStatus::DigioSignFailed,
        CanonicalStatus::DigioSignExpired,
        CanonicalStatus::KycPending,
        CanonicalStatus::KycVerified,
        CanonicalStatus::MandateRegistered,
        CanonicalStatus::OrderCreated,
        CanonicalStatus::OrderPending,
        CanonicalStatus::OrderApproved,
        CanonicalStatus::OrderPlaced,
        CanonicalStatus::OrderProcessing,
        CanonicalStatus::OrderProcessed,
        CanonicalStatus::OrderAllotted,
        CanonicalStatus::OrderSettled,
        CanonicalStatus::OrderRejected,
        CanonicalStatus::OrderCancelled,
        CanonicalStatus::OrderFailed,
        CanonicalStatus::OrderExpired,
        CanonicalStatus::OrderLimitReached,
        CanonicalStatus::OrderRefundInitiated,
        CanonicalStatus::OrderRefunded,
    ];

    /// The canonical name, used verbatim as the webhook event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::PaymentLinkSent => "PAYMENT_LINK_SENT",
            CanonicalStatus::PaymentPending => "PAYMENT_PENDING",
            CanonicalStatus::PaymentSuccess => "PAYMENT_SUCCESS",
            CanonicalStatus::PaymentFailed => "PAYMENT_FAILED",
            CanonicalStatus::PaymentExpired => "PAYMENT_EXPIRED",
            CanonicalStatus::PaymentRefunded => "PAYMENT_REFUNDED",
            CanonicalStatus::DigioSignPending => "DIGIO_SIGN_PENDING",
            CanonicalStatus::DigioSignSuccess => "DIGIO_SIGN_SUCCESS",
            CanonicalStatus::DigioSignFailed => "DIGIO_SIGN_FAILED",
            CanonicalStatus::DigioSignExpired => "DIGIO_SIGN_EXPIRED",
            CanonicalStatus::KycPending => "KYC_PENDING",
            CanonicalStatus::KycVerified => "KYC_VERIFIED",
            CanonicalStatus::MandateRegistered => "MANDATE_REGISTERED",
            CanonicalStatus::OrderCreated => "ORDER_CREATED",
            CanonicalStatus::OrderPending => "ORDER_PENDING",
            CanonicalStatus::OrderApproved => "ORDER_APPROVED",
            CanonicalStatus::OrderPlaced => "ORDER_PLACED",
            CanonicalStatus::OrderProcessing => "ORDER_PROCESSING",
            CanonicalStatus::OrderProcessed => "ORDER_PROCESSED",
            CanonicalStatus::OrderAllotted => "ORDER_ALLOTTED",
            CanonicalStatus::OrderSettled => "ORDER_SETTLED",
            CanonicalStatus::OrderRejected => "ORDER_REJECTED",
            CanonicalStatus::OrderCancelled => "ORDER_CANCELLED",
            CanonicalStatus::OrderFailed => "ORDER_FAILED",
            CanonicalStatus::OrderExpired => "ORDER_EXPIRED",
            CanonicalStatus::OrderLimitReached => "ORDER_LIMIT_REACHED",
            CanonicalStatus::OrderRefundInitiated => "ORDER_REFUND_INITIATED",
            CanonicalStatus::OrderRefunded => "ORDER_REFUNDED",
        }
    }

    /// Statuses after which no further lifecycle movement is expected.
    ///
    /// Only used to flag suspicious sequences; nothing is blocked on it.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CanonicalStatus::OrderRejected
                | CanonicalStatus::OrderCancelled
                | CanonicalStatus::OrderFailed
                | CanonicalStatus::OrderExpired
                | CanonicalStatus::OrderRefunded
                | CanonicalStatus::PaymentRefunded
        )
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalStatus {
    type Err = LifecycleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        normalize(raw)
    }
}

/// Partner and legacy spellings, many-to-one onto canonical statuses.
///
/// The canonical names themselves are added when the lookup table is built.
const SYNONYMS: &[(&str, CanonicalStatus)] = &[
    // Payment gateway codes
    ("link_sent", CanonicalStatus::PaymentLinkSent),
    ("Payment Link Sent", CanonicalStatus::PaymentLinkSent),
    ("payment_pending", CanonicalStatus::PaymentPending),
    ("Payment Pending", CanonicalStatus::PaymentPending),
    ("paid", CanonicalStatus::PaymentSuccess),
    ("captured", CanonicalStatus::PaymentSuccess),
    ("success", CanonicalStatus::PaymentSuccess),
    ("Payment Successful", CanonicalStatus::PaymentSuccess),
    ("payment_failed", CanonicalStatus::PaymentFailed),
    ("Payment Failed", CanonicalStatus::PaymentFailed),
    ("link_expired", CanonicalStatus::PaymentExpired),
    ("Payment Link Expired", CanonicalStatus::PaymentExpired),
    ("refunded", CanonicalStatus::PaymentRefunded),
    ("Payment Refunded", CanonicalStatus::PaymentRefunded),
    // e-sign partner codes
    ("sign_requested", CanonicalStatus::DigioSignPending),
    ("Sign Pending", CanonicalStatus::DigioSignPending),
    ("signed", CanonicalStatus::DigioSignSuccess),
    ("Document Signed", CanonicalStatus::DigioSignSuccess),
    ("sign_failed", CanonicalStatus::DigioSignFailed),
    ("Sign Failed", CanonicalStatus::DigioSignFailed),
    ("sign_expired", CanonicalStatus::DigioSignExpired),
    ("Sign Expired", CanonicalStatus::DigioSignExpired),
    // KYC and mandate
    ("kyc_pending", CanonicalStatus::KycPending),
    ("KYC Pending", CanonicalStatus::KycPending),
    ("kyc_verified", CanonicalStatus::KycVerified),
    ("KYC Verified", CanonicalStatus::KycVerified),
    ("mandate_registered", CanonicalStatus::MandateRegistered),
    ("Mandate Registered", CanonicalStatus::MandateRegistered),
    // Order desk codes
    ("created", CanonicalStatus::OrderCreated),
    ("Order Created", CanonicalStatus::OrderCreated),
    ("pending", CanonicalStatus::OrderPending),
    ("Order Pending", CanonicalStatus::OrderPending),
    ("approved", CanonicalStatus::OrderApproved),
    ("Order Approved", CanonicalStatus::OrderApproved),
    ("placed", CanonicalStatus::OrderPlaced),
    ("Order Placed", CanonicalStatus::OrderPlaced),
    ("processing", CanonicalStatus::OrderProcessing),
    ("in_progress", CanonicalStatus::OrderProcessing),
    ("Order Processing", CanonicalStatus::OrderProcessing),
    ("processed", CanonicalStatus::OrderProcessed),
    ("completed", CanonicalStatus::OrderProcessed),
    ("Order Processed", CanonicalStatus::OrderProcessed),
    ("allotted", CanonicalStatus::OrderAllotted),
    ("Units Allotted", CanonicalStatus::OrderAllotted),
    ("settled", CanonicalStatus::OrderSettled),
    ("Order Settled", CanonicalStatus::OrderSettled),
    ("rejected", CanonicalStatus::OrderRejected),
    ("Order Rejected", CanonicalStatus::OrderRejected),
    ("cancelled", CanonicalStatus::OrderCancelled),
    ("canceled", CanonicalStatus::OrderCancelled),
    ("Order Cancelled", CanonicalStatus::OrderCancelled),
    ("failed", CanonicalStatus::OrderFailed),
    ("Order Failed", CanonicalStatus::OrderFailed),
    ("expired", CanonicalStatus::OrderExpired),
    ("Order Expired", CanonicalStatus::OrderExpired),
    ("limit_reached", CanonicalStatus::OrderLimitReached),
    ("Order Limit Reached", CanonicalStatus::OrderLimitReached),
    ("refund_initiated", CanonicalStatus::OrderRefundInitiated),
    ("Refund Initiated", CanonicalStatus::OrderRefundInitiated),
    ("order_refunded", CanonicalStatus::OrderRefunded),
    ("Order Refunded", CanonicalStatus::OrderRefunded),
];

static LOOKUP: LazyLock<HashMap<&'static str, CanonicalStatus>> = LazyLock::new(|| {
    CanonicalStatus::ALL
        .iter()
        .map(|status| (status.as_str(), *status))
        .chain(SYNONYMS.iter().copied())
        .collect()
});

/// Maps a raw upstream status string onto its canonical status.
///
/// Matching is exact and case-sensitive. Anything outside the synonym table
/// is rejected with [`LifecycleError::UnknownStatus`].
pub fn normalize(raw: &str) -> Result<CanonicalStatus, LifecycleError> {
    LOOKUP
        .get(raw)
        .copied()
        .ok_or_else(|| LifecycleError::UnknownStatus(raw.to_string()))
}
