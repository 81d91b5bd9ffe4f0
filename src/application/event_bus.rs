use crate::domain::ports::ReactorBox;
use crate::domain::transition::Transition;
use crate::error::LifecycleError;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use uuid::Uuid;

/// A reactor failure caught by the bus during one publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorFailure {
    pub reactor: String,
    pub error: String,
}

/// What happened to one published transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub transition_id: Uuid,
    pub reactors_invoked: usize,
    pub failures: Vec<ReactorFailure>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// In-process fan-out of transitions to a fixed list of reactors.
///
/// Reactors are registered at startup through `subscribe` (which needs
/// `&mut self`); once the bus is shared behind an `Arc` the list cannot change.
/// Every reactor sees every transition, in registration order, on the
/// publisher's task. A reactor that panics is reported like one that
/// returned an error. The bus keeps no history.
#[derive(Default)]
pub struct EventBus {
    reactors: Vec<ReactorBox>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, reactor: ReactorBox) {
        tracing::debug!(reactor = reactor.name(), "reactor registered");
        self.reactors.push(reactor);
    }

    pub fn len(&self) -> usize {
        self.reactors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactors.is_empty()
    }

    /// Hands the transition to each reactor in turn.
    ///
    /// A failing or panicking reactor is logged and recorded in the report;
    /// the remaining reactors still run.
    pub async fn publish(&self, transition: Transition) -> PublishReport {
        let transition = Arc::new(transition);
        let mut failures = Vec::new();

        for reactor in &self.reactors {
            let outcome = AssertUnwindSafe(reactor.handle(Arc::clone(&transition)))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(LifecycleError::Reactor {
                        reactor: reactor.name().to_string(),
                        reason: format!("panicked: {}", panic_message(panic.as_ref())),
                    })
                });
            if let Err(e) = outcome {
                let e = e.into_reactor_error(reactor.name());
                tracing::error!(
                    reactor = reactor.name(),
                    order_id = %transition.order_id,
                    status = %transition.new_status,
                    "{e}"
                );
                failures.push(ReactorFailure {
                    reactor: reactor.name().to_string(),
                    error: e.to_string(),
                });
            }
        }

        PublishReport {
            transition_id: transition.transition_id,
            reactors_invoked: self.reactors.len(),
            failures,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
