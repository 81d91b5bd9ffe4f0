use serde::{Deserialize, Serialize};
use std::fmt;

/// The product family an order belongs to. Routing key only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    MutualFund,
    ListedBond,
    UnlistedEquity,
    Mld,
    FixedDeposit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSubType {
    Sip,
    Lumpsum,
    Redemption,
    SwitchIn,
    SwitchOut,
    StpIn,
    StpOut,
    Swp,
}

/// Customer-facing identity selecting template set and sender address downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrandIdentity {
    Partner,
    Secondary,
}

impl fmt::Display for BrandIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrandIdentity::Partner => f.write_str("PARTNER"),
            BrandIdentity::Secondary => f.write_str("SECONDARY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_keys_deserialize_from_wire_names() {
        let product: ProductType = serde_json::from_str("\"UNLISTED_EQUITY\"").unwrap();
        assert_eq!(product, ProductType::UnlistedEquity);

        let sub: ProductSubType = serde_json::from_str("\"SWITCH_OUT\"").unwrap();
        assert_eq!(sub, ProductSubType::SwitchOut);

        assert!(serde_json::from_str::<ProductType>("\"mutual_fund\"").is_err());
    }

    #[test]
    fn test_brand_display_matches_serde() {
        for brand in [BrandIdentity::Partner, BrandIdentity::Secondary] {
            let json = serde_json::to_string(&brand).unwrap();
            assert_eq!(json, format!("\"{brand}\""));
        }
    }
}
