//! Application layer orchestrating the lifecycle dispatch core.
//!
//! The `LifecycleEmitter` turns upstream callbacks into transitions and
//! publishes them on the `EventBus`. Two reactors hang off the bus: the
//! notification reactor (driven by the `NotificationRouter`) and the webhook
//! reactor, which fans each transition out to tenant endpoints on independent
//! `tokio` tasks.

pub mod dispatcher;
pub mod emitter;
pub mod event_bus;
pub mod router;
