pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::build_report::BuildReportUseCase;
use crate::application::commands::{Command, CommandContext, CommandDispatcher};
use crate::application::fanout::{FanoutJob, FanoutSummary};
use crate::application::scheduler::{ArmOutcome, DailyScheduler};
use crate::config::Settings;
use crate::domain::entities::report::Report;
use crate::domain::error::{DomainError, ReportError};
use crate::domain::ports::listing_source::ListingSource;
use crate::domain::ports::message_sender::MessageSender;
use crate::domain::ports::subscription_repository::SubscriptionRepository;
use crate::domain::values::recipient_id::RecipientId;
use crate::infrastructure::steam::search_client::SteamSearchClient;
use crate::infrastructure::storage::json_subscriptions::JsonSubscriptionStore;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct TopSellers {
    settings: Settings,
    build_report_uc: Arc<BuildReportUseCase>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    fanout_job: Arc<FanoutJob>,
    dispatcher: CommandDispatcher,
    scheduler: DailyScheduler,
}

impl TopSellers {
    /// Wire the Steam client and the JSON subscription file from `settings`.
    pub fn new(settings: Settings, sender: Arc<dyn MessageSender>) -> Self {
        let store = JsonSubscriptionStore::load(&settings.data_path, &settings.static_recipients());
        Self::with_providers(settings, Arc::new(SteamSearchClient::new()), Arc::new(store), sender)
    }

    pub fn with_providers(
        settings: Settings,
        source: Arc<dyn ListingSource>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        let build_report_uc = Arc::new(BuildReportUseCase::new(source));
        let fanout_job = Arc::new(FanoutJob::new(
            build_report_uc.clone(),
            subscriptions.clone(),
            sender,
            settings.default_top_num,
        ));
        let dispatcher = CommandDispatcher::new(
            build_report_uc.clone(),
            subscriptions.clone(),
            settings.default_top_num,
        );

        Self {
            settings,
            build_report_uc,
            subscriptions,
            fanout_job,
            dispatcher,
            scheduler: DailyScheduler::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn report(&self, count: Option<i64>) -> Result<Report, ReportError> {
        self.build_report_uc
            .execute(count.unwrap_or(self.settings.default_top_num))
            .await
    }

    pub fn subscribe(&self, origin: &str) -> Result<bool, DomainError> {
        let id = RecipientId::new(origin).map_err(DomainError::InvalidInput)?;
        Ok(self.subscriptions.add(&id))
    }

    pub fn unsubscribe(&self, origin: &str) -> Result<bool, DomainError> {
        let id = RecipientId::new(origin).map_err(DomainError::InvalidInput)?;
        Ok(self.subscriptions.remove(&id))
    }

    pub fn subscriptions(&self) -> BTreeSet<RecipientId> {
        self.subscriptions.list()
    }

    pub async fn dispatch(&self, ctx: &CommandContext, cmd: Command) -> String {
        self.dispatcher.dispatch(ctx, cmd).await
    }

    /// Parse and run a chat message. `None` if it is not one of our commands.
    pub async fn handle_message(&self, ctx: &CommandContext, text: &str) -> Option<String> {
        let cmd = Command::parse(text)?;
        Some(self.dispatch(ctx, cmd).await)
    }

    pub async fn run_fanout(&self) -> FanoutSummary {
        self.fanout_job.run().await
    }

    /// Arm the daily report at the configured `remind_time`.
    pub async fn start_scheduler(&self) -> Result<ArmOutcome, DomainError> {
        self.scheduler
            .arm_from_config(&self.settings.remind_time, self.fanout_job.clone())
            .await
    }

    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}
