use crate::domain::values::recipient_id::RecipientId;
use std::collections::BTreeSet;

/// Registry of recipients subscribed to the daily report.
/// Mutations are linearized; persistence failures never surface here.
pub trait SubscriptionRepository: Send + Sync {
    /// Returns false if the recipient was already subscribed.
    fn add(&self, id: &RecipientId) -> bool;
    /// Returns false if the recipient was not subscribed.
    fn remove(&self, id: &RecipientId) -> bool;
    /// Point-in-time snapshot.
    fn list(&self) -> BTreeSet<RecipientId>;

    fn contains(&self, id: &RecipientId) -> bool {
        self.list().contains(id)
    }

    fn is_empty(&self) -> bool {
        self.list().is_empty()
    }
}
