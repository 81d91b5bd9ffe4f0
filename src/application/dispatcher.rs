use crate::domain::ports::{Reactor, WebhookClientRef, WebhookRegistryBox};
use crate::domain::transition::Transition;
use crate::domain::webhook::{DeliveryAttempt, DeliveryOutcome, HttpMethod, WebhookBody};
use crate::error::{LifecycleError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Upper bound for a single webhook request, connect through response.
    pub request_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
struct DeliveryTarget {
    subscription_id: String,
    event_name: String,
    url: String,
    method: HttpMethod,
}

/// Deliveries started for one transition, each running on its own task.
pub struct PendingDeliveries {
    transition_id: Uuid,
    order_id: String,
    deliveries: Vec<(DeliveryTarget, JoinHandle<DeliveryOutcome>)>,
}

impl PendingDeliveries {
    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Waits for every delivery and collects the attempts.
    ///
    /// A delivery task that panicked is reported as a failed attempt.
    pub async fn join(self) -> Vec<DeliveryAttempt> {
        let mut attempts = Vec::with_capacity(self.deliveries.len());
        for (target, handle) in self.deliveries {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(url = %target.url, "delivery task aborted: {e}");
                    DeliveryOutcome::Failure {
                        error: format!("delivery task aborted: {e}"),
                    }
                }
            };
            attempts.push(DeliveryAttempt {
                subscription_id: target.subscription_id,
                event_name: target.event_name,
                transition_id: self.transition_id,
                order_id: self.order_id.clone(),
                url: target.url,
                outcome,
            });
        }
        attempts
    }
}

/// Delivers transitions to every tenant webhook subscribed to the new status.
///
/// One request per matching (subscription, event name) pair; no retries and
/// no de-duplication of repeated statuses.
pub struct WebhookDispatcher {
    registry: WebhookRegistryBox,
    client: WebhookClientRef,
    config: DispatcherConfig,
}

impl WebhookDispatcher {
    pub fn new(registry: WebhookRegistryBox, client: WebhookClientRef) -> Self {
        Self::with_config(registry, client, DispatcherConfig::default())
    }

    pub fn with_config(
        registry: WebhookRegistryBox,
        client: WebhookClientRef,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            client,
            config,
        }
    }

    /// Loads the tenant's subscriptions once and starts a task per match.
    ///
    /// Only a registry failure is returned as an error; delivery failures end
    /// up in the attempts produced by [`PendingDeliveries::join`].
    pub async fn spawn_deliveries(&self, transition: &Transition) -> Result<PendingDeliveries> {
        let subscriptions = self
            .registry
            .subscriptions_for(&transition.account_id)
            .await?;
        let status = transition.event_name();

        let mut deliveries = Vec::new();
        for subscription in &subscriptions {
            for event_name in &subscription.subscribed_event_names {
                if event_name != status {
                    continue;
                }
                let target = DeliveryTarget {
                    subscription_id: subscription.subscription_id.clone(),
                    event_name: event_name.clone(),
                    url: subscription.url.clone(),
                    method: subscription.http_method,
                };
                let handle = tokio::spawn(deliver(
                    Arc::clone(&self.client),
                    target.clone(),
                    transition.order_id.clone(),
                    self.config.request_timeout,
                ));
                deliveries.push((target, handle));
            }
        }

        tracing::debug!(
            account_id = %transition.account_id,
            order_id = %transition.order_id,
            subscriptions = subscriptions.len(),
            matched = deliveries.len(),
            "webhook deliveries started"
        );

        Ok(PendingDeliveries {
            transition_id: transition.transition_id,
            order_id: transition.order_id.clone(),
            deliveries,
        })
    }

    /// Delivers the transition and waits for every attempt to finish.
    pub async fn dispatch(&self, transition: &Transition) -> Result<Vec<DeliveryAttempt>> {
        let pending = self.spawn_deliveries(transition).await?;
        Ok(pending.join().await)
    }
}

async fn deliver(
    client: WebhookClientRef,
    target: DeliveryTarget,
    order_id: String,
    timeout: Duration,
) -> DeliveryOutcome {
    let body = WebhookBody::for_event(target.event_name.as_str());
    let request = client.request(target.method, &target.url, &body);
    let result = tokio::time::timeout(timeout, request).await;

    let outcome = match result {
        Ok(Ok(response)) if response.is_success() => DeliveryOutcome::Success {
            status: response.status,
        },
        Ok(Ok(response)) => {
            failure(&target.url, format!("unexpected status {}", response.status))
        }
        Ok(Err(e @ LifecycleError::Delivery { .. })) => DeliveryOutcome::Failure {
            error: e.to_string(),
        },
        Ok(Err(e)) => failure(&target.url, e.to_string()),
        Err(_) => failure(&target.url, format!("timed out after {timeout:?}")),
    };

    match &outcome {
        DeliveryOutcome::Success { status } => tracing::info!(
            url = %target.url,
            subscription_id = %target.subscription_id,
            event = %target.event_name,
            order_id = %order_id,
            status,
            "webhook delivered"
        ),
        DeliveryOutcome::Failure { error } => tracing::error!(
            url = %target.url,
            subscription_id = %target.subscription_id,
            event = %target.event_name,
            order_id = %order_id,
            "{error}"
        ),
    }
    outcome
}

fn failure(url: &str, reason: String) -> DeliveryOutcome {
    DeliveryOutcome::Failure {
        error: LifecycleError::Delivery {
            url: url.to_string(),
            reason,
        }
        .to_string(),
    }
}

/// Bus adapter for the dispatcher.
///
/// Returns to the bus as soon as deliveries are started, so a slow endpoint
/// never holds up the reactors behind it. Finished attempts are forwarded to
/// the report channel when one is attached.
pub struct WebhookReactor {
    dispatcher: WebhookDispatcher,
    reports: Option<UnboundedSender<DeliveryAttempt>>,
}

impl WebhookReactor {
    pub fn new(dispatcher: WebhookDispatcher) -> Self {
        Self {
            dispatcher,
            reports: None,
        }
    }

    pub fn with_reports(mut self, reports: UnboundedSender<DeliveryAttempt>) -> Self {
        self.reports = Some(reports);
        self
    }
}

#[async_trait]
impl Reactor for WebhookReactor {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn handle(&self, transition: Arc<Transition>) -> Result<()> {
        let pending = self.dispatcher.spawn_deliveries(&transition).await?;
        if pending.is_empty() {
            return Ok(());
        }

        let reports = self.reports.clone();
        tokio::spawn(async move {
            for attempt in pending.join().await {
                if let Some(reports) = &reports {
                    // Receiver gone means nobody is collecting; attempts are already logged.
                    let _ = reports.send(attempt);
                }
            }
        });
        Ok(())
    }
}
