//! Notification dispatch for slot-request resolutions.
//!
//! Approval notifications are dispatched only after the database
//! transaction has committed, and a delivery failure is logged rather than
//! surfaced to the caller; the approval itself already succeeded.

use async_trait::async_trait;
use parkfleet_core::error::CoreError;
use serde_json::Value;

/// Template id for the slot-request approval notification.
pub const TEMPLATE_SLOT_REQUEST_APPROVED: &str = "slot_request_approved";

/// Delivery seam for outbound notifications.
///
/// Production wires a real channel here; tests and local development use
/// [`LogNotifier`].
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a templated notification to a recipient contact (an email
    /// address for the current channel).
    async fn send(
        &self,
        recipient_contact: &str,
        template_id: &str,
        data: Value,
    ) -> Result<(), CoreError>;
}

/// A [`Notifier`] that writes deliveries to the log instead of a channel.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(
        &self,
        recipient_contact: &str,
        template_id: &str,
        data: Value,
    ) -> Result<(), CoreError> {
        tracing::info!(
            recipient = %recipient_contact,
            template = %template_id,
            %data,
            "Notification dispatched"
        );
        Ok(())
    }
}
