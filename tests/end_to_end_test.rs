use order_lifecycle::application::dispatcher::{WebhookDispatcher, WebhookReactor};
use order_lifecycle::application::emitter::LifecycleEmitter;
use order_lifecycle::application::event_bus::EventBus;
use order_lifecycle::application::router::{NotificationReactor, NotificationRouter};
use order_lifecycle::domain::product::{BrandIdentity, ProductType};
use order_lifecycle::domain::status::CanonicalStatus;
use order_lifecycle::domain::transition::{OrderUpdate, Transition};
use order_lifecycle::domain::webhook::{HttpMethod, WebhookBody, WebhookSubscription};
use order_lifecycle::infrastructure::in_memory::{InMemoryOrderStore, InMemoryWebhookRegistry};
use std::sync::Arc;
use tokio::sync::mpsc;

mod common;
use common::{RecordingClient, RecordingSender};

async fn registry(subs: Vec<WebhookSubscription>) -> InMemoryWebhookRegistry {
    let registry = InMemoryWebhookRegistry::new();
    for sub in subs {
        registry.register(sub).await;
    }
    registry
}

#[tokio::test]
async fn test_listed_bond_created_scenario() {
    let transition = Transition::new(
        "O1",
        "A1",
        "a@x.com",
        ProductType::ListedBond,
        CanonicalStatus::OrderCreated,
    );

    let route = NotificationRouter::new().route(&transition);
    assert_eq!(route.path_name, "/payments/O1/listed-bonds");
    assert_eq!(route.brand, BrandIdentity::Secondary);

    let client = RecordingClient::default();
    let subs = vec![common::subscription("s1", "https://tenant.example/hooks", "ORDER_CREATED")];
    let dispatcher =
        WebhookDispatcher::new(Box::new(registry(subs).await), Arc::new(client.clone()));

    let attempts = dispatcher.dispatch(&transition).await.unwrap();

    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].is_success());
    let calls = client.calls.lock().unwrap();
    assert_eq!(
        calls.as_slice(),
        &[(
            HttpMethod::Post,
            "https://tenant.example/hooks".to_string(),
            WebhookBody::for_event("ORDER_CREATED")
        )]
    );
    assert_eq!(
        serde_json::to_value(&calls[0].2).unwrap(),
        serde_json::json!({"event": "ORDER_CREATED", "payload": {}})
    );
}

#[tokio::test]
async fn test_full_pipeline_through_emitter() {
    let sender = RecordingSender::default();
    let client = RecordingClient::with_unreachable(&["https://down.example/hooks"]);
    let subs = vec![
        common::subscription("down", "https://down.example/hooks", "ORDER_CREATED"),
        common::subscription("up", "https://up.example/hooks", "ORDER_CREATED"),
        common::subscription("later", "https://later.example/hooks", "ORDER_REJECTED"),
    ];

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut bus = EventBus::new();
    let dispatcher =
        WebhookDispatcher::new(Box::new(registry(subs).await), Arc::new(client.clone()));
    bus.subscribe(Box::new(WebhookReactor::new(dispatcher).with_reports(tx)));
    bus.subscribe(Box::new(NotificationReactor::new(Box::new(sender.clone()))));
    let emitter = LifecycleEmitter::new(Arc::new(bus), Box::new(InMemoryOrderStore::new()));

    let update = OrderUpdate {
        order_id: "O1".into(),
        account_id: "A1".into(),
        customer_email: "a@x.com".into(),
        product_type: ProductType::Mld,
        product_sub_type: None,
        status: "Order Created".into(),
    };
    let report = emitter.accept(&update).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(report.reactors_invoked, 2);

    drop(emitter);
    let mut attempts = Vec::new();
    while let Some(attempt) = rx.recv().await {
        attempts.push(attempt);
    }

    // Two matching subscriptions, one unreachable: still one success.
    assert_eq!(attempts.len(), 2);
    assert!(attempts.iter().any(|a| a.subscription_id == "up" && a.is_success()));
    assert!(attempts.iter().any(|a| a.subscription_id == "down" && !a.is_success()));
    assert!(!client.urls().contains(&"https://later.example/hooks".to_string()));

    assert_eq!(
        sender.sent.lock().unwrap().as_slice(),
        &[(
            BrandIdentity::Secondary,
            "a@x.com".to_string(),
            "/payments/O1/market-linked-debentures".to_string()
        )]
    );
}
