use crate::domain::error::DeliveryError;
use crate::domain::ports::message_sender::MessageSender;
use crate::domain::values::recipient_id::RecipientId;
use async_trait::async_trait;
use std::io::Write;

/// Prints each delivery to stdout, prefixed with the recipient.
/// Used by the CLI in place of a chat platform.
pub struct ConsoleSender;

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, recipient: &RecipientId, text: &str) -> Result<(), DeliveryError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "==> {recipient}\n{text}\n").map_err(|e| DeliveryError {
            recipient: recipient.to_string(),
            reason: e.to_string(),
        })
    }
}
