//! # Core subscriber trait
//!
//! `Subscribe` is how reporting sinks plug into a suite run. Each subscriber is
//! driven by its own worker fed by a bounded queue owned by the
//! [`SubscriberSet`](crate::SubscriberSet), so a slow sink never delays
//! scheduling.
//!
//! ## Contract
//! - events arrive in publication order per subscriber
//! - on queue overflow the event is dropped for that subscriber only and a
//!   `SubscriberOverflow` event is published
//! - a panic in `on_event` is caught and reported as `SubscriberPanicked`

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
///
/// # Example
/// ```rust
/// use suitevisor::{Event, EventKind, Subscribe};
///
/// struct Audit;
///
/// #[async_trait::async_trait]
/// impl Subscribe for Audit {
///     async fn on_event(&self, ev: &Event) {
///         if ev.kind == EventKind::ScenarioFailed {
///             // write audit record...
///         }
///     }
///     fn name(&self) -> &'static str { "audit" }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
