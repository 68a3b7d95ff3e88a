use crate::application::fanout::FanoutJob;
use crate::domain::error::DomainError;
use crate::domain::values::schedule_spec::ScheduleSpec;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Key of the single recurring job this scheduler manages.
pub const DAILY_REPORT_JOB: &str = "steam_topsellers_daily_report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmOutcome {
    Armed(ScheduleSpec),
    /// A job with the same key was already registered; nothing changed.
    AlreadyArmed(ScheduleSpec),
    /// The configured time did not parse; the scheduler stays disarmed.
    InvalidTime,
}

#[derive(Default)]
struct SchedulerState {
    scheduler: Option<JobScheduler>,
    jobs: HashMap<&'static str, (Uuid, ScheduleSpec)>,
}

/// Fires the daily fan-out once a day at a local wall-clock time.
#[derive(Default)]
pub struct DailyScheduler {
    state: Mutex<SchedulerState>,
}

impl DailyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `remind_time` and arm. An unparseable time is logged and
    /// leaves the scheduler disarmed.
    pub async fn arm_from_config(
        &self,
        remind_time: &str,
        job: Arc<FanoutJob>,
    ) -> Result<ArmOutcome, DomainError> {
        match ScheduleSpec::parse(remind_time) {
            Some(spec) => self.arm(spec, job).await,
            None => {
                warn!(remind_time, "Invalid remind_time, daily report not scheduled");
                Ok(ArmOutcome::InvalidTime)
            }
        }
    }

    /// Register the daily job. A second call while armed is a no-op.
    pub async fn arm(&self, spec: ScheduleSpec, job: Arc<FanoutJob>) -> Result<ArmOutcome, DomainError> {
        let mut state = self.state.lock().await;
        if let Some((_, armed)) = state.jobs.get(DAILY_REPORT_JOB) {
            info!(at = %armed, "Daily report already scheduled");
            return Ok(ArmOutcome::AlreadyArmed(*armed));
        }

        let scheduler = match &state.scheduler {
            Some(s) => s.clone(),
            None => {
                let s = JobScheduler::new().await.map_err(scheduler_err)?;
                s.start().await.map_err(scheduler_err)?;
                state.scheduler = Some(s.clone());
                s
            }
        };

        let cron_job = daily_job(&spec.cron_expression(), job)?;
        let id = scheduler.add(cron_job).await.map_err(scheduler_err)?;
        state.jobs.insert(DAILY_REPORT_JOB, (id, spec));
        info!(at = %spec, job_id = %id, "Daily report scheduled");
        Ok(ArmOutcome::Armed(spec))
    }

    /// Stop the scheduler if running. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        state.jobs.clear();
        if let Some(mut scheduler) = state.scheduler.take() {
            match scheduler.shutdown().await {
                Ok(()) => info!("Scheduler stopped"),
                Err(e) => error!(error = %e, "Scheduler shutdown failed"),
            }
        }
    }
}

/// Cron job (local time) that runs the fan-out once per trigger.
pub fn daily_job(cron: &str, job: Arc<FanoutJob>) -> Result<Job, DomainError> {
    Job::new_async_tz(cron, chrono::Local, move |_uuid, _lock| {
        let job = job.clone();
        Box::pin(async move {
            let summary = job.run().await;
            info!(outcome = ?summary.outcome, delivered = summary.delivered, "Scheduled daily report ran");
        })
    })
    .map_err(scheduler_err)
}

fn scheduler_err(e: tokio_cron_scheduler::JobSchedulerError) -> DomainError {
    DomainError::Scheduler(e.to_string())
}
