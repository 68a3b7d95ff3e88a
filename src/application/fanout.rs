use crate::application::build_report::BuildReportUseCase;
use crate::domain::ports::message_sender::MessageSender;
use crate::domain::ports::subscription_repository::SubscriptionRepository;
use crate::domain::values::recipient_id::RecipientId;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanoutOutcome {
    /// Nobody subscribed; no fetch was made.
    NoSubscribers,
    /// The report could not be built; nothing was sent.
    ReportFailed,
    Completed,
}

#[derive(Debug, Serialize)]
pub struct FanoutSummary {
    pub outcome: FanoutOutcome,
    pub recipients: usize,
    pub delivered: usize,
    pub failed: Vec<(RecipientId, String)>,
}

impl FanoutSummary {
    fn skipped(outcome: FanoutOutcome, recipients: usize) -> Self {
        Self {
            outcome,
            recipients,
            delivered: 0,
            failed: Vec::new(),
        }
    }
}

/// Builds one report and delivers it to every subscriber.
pub struct FanoutJob {
    builder: Arc<BuildReportUseCase>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    sender: Arc<dyn MessageSender>,
    top_num: i64,
}

impl FanoutJob {
    pub fn new(
        builder: Arc<BuildReportUseCase>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        sender: Arc<dyn MessageSender>,
        top_num: i64,
    ) -> Self {
        Self {
            builder,
            subscriptions,
            sender,
            top_num,
        }
    }

    /// One failed delivery never stops the others.
    pub async fn run(&self) -> FanoutSummary {
        let recipients = self.subscriptions.list();
        if recipients.is_empty() {
            info!("No subscribers, skipping daily report");
            return FanoutSummary::skipped(FanoutOutcome::NoSubscribers, 0);
        }

        let report = match self.builder.execute(self.top_num).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, recipients = recipients.len(), "Daily report build failed, nothing sent");
                return FanoutSummary::skipped(FanoutOutcome::ReportFailed, recipients.len());
            }
        };
        let text = report.render();

        let mut delivered = 0;
        let mut failed = Vec::new();
        for recipient in &recipients {
            match self.sender.send(recipient, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(recipient = %recipient, error = %e, "Daily report delivery failed");
                    failed.push((recipient.clone(), e.reason));
                }
            }
        }

        info!(
            recipients = recipients.len(),
            delivered,
            failed = failed.len(),
            "Daily report fan-out finished"
        );
        FanoutSummary {
            outcome: FanoutOutcome::Completed,
            recipients: recipients.len(),
            delivered,
            failed,
        }
    }
}
