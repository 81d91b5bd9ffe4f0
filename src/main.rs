use clap::Parser;
use miette::{IntoDiagnostic, Result};
use order_lifecycle::application::dispatcher::{DispatcherConfig, WebhookDispatcher, WebhookReactor};
use order_lifecycle::application::emitter::LifecycleEmitter;
use order_lifecycle::application::event_bus::EventBus;
use order_lifecycle::application::router::NotificationReactor;
use order_lifecycle::domain::ports::{OrderStoreBox, WebhookRegistryBox};
use order_lifecycle::domain::webhook::{DeliveryAttempt, WebhookSubscription};
use order_lifecycle::infrastructure::http::ReqwestWebhookClient;
use order_lifecycle::infrastructure::in_memory::{InMemoryOrderStore, InMemoryWebhookRegistry};
use order_lifecycle::infrastructure::notification::LogNotificationSender;
use order_lifecycle::interfaces::csv::attempt_writer::DeliveryAttemptWriter;
use order_lifecycle::interfaces::csv::update_reader::OrderUpdateReader;
use order_lifecycle::interfaces::json::subscriptions::read_subscriptions;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Upstream status callbacks CSV file
    input: PathBuf,

    /// JSON array of webhook subscriptions to register before replaying
    #[arg(long)]
    subscriptions: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Timeout for each webhook request, in milliseconds
    #[arg(long, env = "ORDER_LIFECYCLE_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,
}

/// Order store and registry handles for one run.
///
/// The emitter only reads orders; `host_orders` is the same store, used by
/// this process to record each accepted update.
struct Stores {
    host_orders: OrderStoreBox,
    orders: OrderStoreBox,
    registry: WebhookRegistryBox,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

async fn open_stores(cli: &Cli, subscriptions: Vec<WebhookSubscription>) -> Result<Stores> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = &cli.db_path {
        use order_lifecycle::infrastructure::rocksdb::RocksDBStore;

        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        for subscription in &subscriptions {
            store.register(subscription).into_diagnostic()?;
        }
        return Ok(Stores {
            host_orders: Box::new(store.clone()),
            orders: Box::new(store.clone()),
            registry: Box::new(store),
        });
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if cli.db_path.is_some() {
        tracing::warn!(
            "persistent storage requested via --db-path, but the 'storage-rocksdb' feature is not enabled; falling back to in-memory storage"
        );
    }

    let orders = InMemoryOrderStore::new();
    let registry = InMemoryWebhookRegistry::new();
    for subscription in subscriptions {
        registry.register(subscription).await;
    }
    Ok(Stores {
        host_orders: Box::new(orders.clone()),
        orders: Box::new(orders),
        registry: Box::new(registry),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let subscriptions = match &cli.subscriptions {
        Some(path) => read_subscriptions(File::open(path).into_diagnostic()?).into_diagnostic()?,
        None => Vec::new(),
    };
    let stores = open_stores(&cli, subscriptions).await?;

    let config = DispatcherConfig {
        request_timeout: Duration::from_millis(cli.timeout_ms),
    };
    let client = ReqwestWebhookClient::new(config.request_timeout).into_diagnostic()?;
    let dispatcher = WebhookDispatcher::with_config(stores.registry, Arc::new(client), config);

    let (reports_tx, mut reports_rx) = mpsc::unbounded_channel();
    let mut bus = EventBus::new();
    bus.subscribe(Box::new(NotificationReactor::new(Box::new(
        LogNotificationSender::new(),
    ))));
    bus.subscribe(Box::new(WebhookReactor::new(dispatcher).with_reports(reports_tx)));
    let emitter = LifecycleEmitter::new(Arc::new(bus), stores.orders);

    // Replay callbacks
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = OrderUpdateReader::new(file);
    for update in reader.updates() {
        match update {
            Ok(update) => match emitter.accept(&update).await {
                Ok(_) => {
                    if let Err(e) = stores.host_orders.put(update).await {
                        tracing::error!("Error recording order update: {e}");
                    }
                }
                Err(e) => tracing::error!("Error processing callback: {e}"),
            },
            Err(e) => tracing::error!("Error reading callback: {e}"),
        }
    }

    // Dropping the emitter drops the bus and its report sender; the channel
    // closes once every in-flight delivery has reported.
    drop(emitter);
    let mut attempts: Vec<DeliveryAttempt> = Vec::new();
    while let Some(attempt) = reports_rx.recv().await {
        attempts.push(attempt);
    }
    attempts.sort_by(|a, b| {
        (&a.order_id, &a.event_name, &a.subscription_id)
            .cmp(&(&b.order_id, &b.event_name, &b.subscription_id))
    });

    let stdout = io::stdout();
    let mut writer = DeliveryAttemptWriter::new(stdout.lock());
    writer.write_attempts(&attempts).into_diagnostic()?;

    Ok(())
}
