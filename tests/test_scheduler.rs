mod common;

use common::{listing_body, rid, store_at, FixtureSource, RecordingSender};
use std::sync::Arc;
use std::time::Duration;
use steam_topsellers::application::build_report::BuildReportUseCase;
use steam_topsellers::application::fanout::FanoutJob;
use steam_topsellers::application::scheduler::{daily_job, ArmOutcome, DailyScheduler};
use steam_topsellers::config::Settings;
use steam_topsellers::domain::ports::subscription_repository::SubscriptionRepository;
use steam_topsellers::domain::values::schedule_spec::ScheduleSpec;
use steam_topsellers::TopSellers;
use tokio_cron_scheduler::JobScheduler;

fn fanout_job(dir: &tempfile::TempDir, sender: Arc<RecordingSender>) -> Arc<FanoutJob> {
    let builder = Arc::new(BuildReportUseCase::new(FixtureSource::ok(listing_body(5))));
    Arc::new(FanoutJob::new(builder, store_at(dir), sender, 5))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_arm_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let sender = RecordingSender::failing_for(&[]);
    let scheduler = DailyScheduler::new();
    let at = ScheduleSpec::new(8, 35).unwrap();

    let first = scheduler.arm(at, fanout_job(&dir, sender.clone())).await.unwrap();
    assert_eq!(first, ArmOutcome::Armed(at));

    let other = ScheduleSpec::new(20, 0).unwrap();
    let second = scheduler.arm(other, fanout_job(&dir, sender.clone())).await.unwrap();
    assert_eq!(second, ArmOutcome::AlreadyArmed(at));

    // Shutdown clears the job, so the next arm registers again.
    scheduler.shutdown().await;
    let third = scheduler.arm(other, fanout_job(&dir, sender)).await.unwrap();
    assert_eq!(third, ArmOutcome::Armed(other));
    scheduler.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_time_leaves_scheduler_disarmed() {
    let dir = tempfile::tempdir().unwrap();
    let sender = RecordingSender::failing_for(&[]);
    let scheduler = DailyScheduler::new();

    let outcome = scheduler
        .arm_from_config("25:00", fanout_job(&dir, sender.clone()))
        .await
        .unwrap();
    assert_eq!(outcome, ArmOutcome::InvalidTime);

    let outcome = scheduler
        .arm_from_config("08:00", fanout_job(&dir, sender))
        .await
        .unwrap();
    assert_eq!(outcome, ArmOutcome::Armed(ScheduleSpec::new(8, 0).unwrap()));
    scheduler.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_without_arming() {
    let scheduler = DailyScheduler::new();
    scheduler.shutdown().await;
    scheduler.shutdown().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_trigger_runs_fanout() {
    let dir = tempfile::tempdir().unwrap();
    store_at(&dir).add(&rid("aiocqhttp:GroupMessage:555"));
    let sender = RecordingSender::failing_for(&[]);
    let job = fanout_job(&dir, sender.clone());

    let mut scheduler = JobScheduler::new().await.unwrap();
    scheduler
        .add(daily_job("* * * * * *", job).unwrap())
        .await
        .unwrap();
    scheduler.start().await.unwrap();

    let mut delivered = false;
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if !sender.recipients().is_empty() {
            delivered = true;
            break;
        }
    }
    scheduler.shutdown().await.unwrap();

    assert!(delivered, "trigger should deliver the report");
    assert_eq!(sender.recipients()[0], "aiocqhttp:GroupMessage:555");
    let sent = sender.sent.lock().unwrap();
    assert!(sent[0].1.starts_with("Steam Top Sellers - Top 5"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_start_scheduler_uses_remind_time() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        remind_time: "7：05".into(),
        ..Settings::default()
    };
    let oi = TopSellers::with_providers(
        settings,
        FixtureSource::ok(listing_body(5)),
        store_at(&dir),
        RecordingSender::failing_for(&[]),
    );

    let outcome = oi.start_scheduler().await.unwrap();
    assert_eq!(outcome, ArmOutcome::Armed(ScheduleSpec::new(7, 5).unwrap()));
    assert!(matches!(
        oi.start_scheduler().await.unwrap(),
        ArmOutcome::AlreadyArmed(_)
    ));
    oi.shutdown().await;
}
