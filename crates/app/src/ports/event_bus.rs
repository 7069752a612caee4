//! Event publisher port — fire-and-forget delivery of trigger events.

use std::future::Future;

use growctl_domain::error::GrowCtlError;
use growctl_domain::event::TriggerEvent;

/// Publishes trigger events for the host application to persist or log.
///
/// The engine never depends on delivery: publication failures are
/// swallowed so that event plumbing can never stall environmental control.
pub trait EventPublisher {
    fn publish(&self, event: TriggerEvent) -> impl Future<Output = Result<(), GrowCtlError>> + Send;
}
