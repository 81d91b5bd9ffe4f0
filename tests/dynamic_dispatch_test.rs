use order_lifecycle::domain::ports::{OrderStoreBox, WebhookRegistryBox};
use order_lifecycle::domain::product::ProductType;
use order_lifecycle::domain::transition::OrderUpdate;
use order_lifecycle::domain::webhook::{HttpMethod, WebhookSubscription};
use order_lifecycle::infrastructure::in_memory::{InMemoryOrderStore, InMemoryWebhookRegistry};

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let order_store: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let registry = InMemoryWebhookRegistry::new();
    registry
        .register(WebhookSubscription::new(
            "s1",
            "A1",
            "https://tenant/hook",
            HttpMethod::Post,
            ["ORDER_CREATED"],
        ))
        .await;
    let registry: WebhookRegistryBox = Box::new(registry);

    let update = OrderUpdate {
        order_id: "O1".into(),
        account_id: "A1".into(),
        customer_email: "a@x.com".into(),
        product_type: ProductType::FixedDeposit,
        product_sub_type: None,
        status: "created".into(),
    };

    // Verify Send + Sync by spawning tasks
    let os_handle = tokio::spawn(async move {
        order_store.put(update).await.unwrap();
        order_store.get("O1").await.unwrap().unwrap()
    });

    let reg_handle = tokio::spawn(async move { registry.subscriptions_for("A1").await.unwrap() });

    let retrieved = os_handle.await.unwrap();
    assert_eq!(retrieved.status, "created");

    let subs = reg_handle.await.unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].subscription_id, "s1");
}
