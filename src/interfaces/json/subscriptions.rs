use crate::domain::status::CanonicalStatus;
use crate::domain::webhook::WebhookSubscription;
use crate::error::Result;
use std::io::Read;

/// Reads a JSON array of webhook subscriptions.
///
/// Event names that are not canonical status names can never match a
/// transition; they are kept as-is but reported.
pub fn read_subscriptions<R: Read>(source: R) -> Result<Vec<WebhookSubscription>> {
    let subscriptions: Vec<WebhookSubscription> = serde_json::from_reader(source)?;

    for subscription in &subscriptions {
        for event in &subscription.subscribed_event_names {
            if !CanonicalStatus::ALL.iter().any(|s| s.as_str() == event) {
                tracing::warn!(
                    subscription_id = %subscription.subscription_id,
                    account_id = %subscription.account_id,
                    event = %event,
                    "subscribed event is not a canonical status and will never fire"
                );
            }
        }
    }

    Ok(subscriptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::HttpMethod;
    use crate::error::LifecycleError;

    #[test]
    fn test_reads_subscription_array() {
        let json = r#"[
            {"subscription_id": "s1", "account_id": "A1", "url": "https://a1/hook",
             "http_method": "POST", "subscribed_event_names": ["ORDER_CREATED"]},
            {"subscription_id": "s2", "account_id": "A2", "url": "https://a2/hook",
             "http_method": "PATCH", "subscribed_event_names": ["created", "ORDER_REJECTED"]}
        ]"#;
        let subs = read_subscriptions(json.as_bytes()).unwrap();

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].http_method, HttpMethod::Patch);
        // Non-canonical names are kept, not rewritten.
        assert!(subs[1].subscribed_event_names.contains("created"));
    }

    #[test]
    fn test_rejects_unknown_method() {
        let json = r#"[{"subscription_id": "s1", "account_id": "A1", "url": "https://a1/hook",
                        "http_method": "TRACE", "subscribed_event_names": []}]"#;
        assert!(matches!(
            read_subscriptions(json.as_bytes()),
            Err(LifecycleError::JsonError(_))
        ));
    }
}
