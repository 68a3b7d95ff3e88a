use crate::domain::error::DeliveryError;
use crate::domain::values::recipient_id::RecipientId;
use async_trait::async_trait;

/// Delivers a text payload to one recipient. May fail per call.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, recipient: &RecipientId, text: &str) -> Result<(), DeliveryError>;
}
