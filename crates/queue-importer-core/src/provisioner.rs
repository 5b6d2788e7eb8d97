//! Making sure the destination queue exists before an import.

use crate::error::{ImportError, ImportResult};
use queue_runtime::{Destination, QueueProvider};
use tracing::info;

/// What provisioning had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadyExisted,
    Created,
}

/// Creates missing destination queues
///
/// Existence is checked against the base queue: a journal destination selects
/// a view of a queue and is never created on its own. Check-then-create is not
/// atomic; a concurrent creator can make `create_queue` fail, which surfaces as
/// a provisioning error.
pub struct QueueProvisioner;

impl QueueProvisioner {
    /// Ensure the base queue of `destination` exists
    pub async fn ensure(
        provider: &dyn QueueProvider,
        destination: &Destination,
    ) -> ImportResult<ProvisionOutcome> {
        let queue = destination.queue();
        let provisioning_error = |source| ImportError::Provisioning {
            queue: queue.to_string(),
            source,
        };

        if provider
            .queue_exists(queue)
            .await
            .map_err(provisioning_error)?
        {
            return Ok(ProvisionOutcome::AlreadyExisted);
        }

        info!(queue = %queue, "Queue does not exist, creating it");
        provider
            .create_queue(queue)
            .await
            .map_err(provisioning_error)?;

        Ok(ProvisionOutcome::Created)
    }
}

#[cfg(test)]
#[path = "provisioner_tests.rs"]
mod tests;
