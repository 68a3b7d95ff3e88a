//! Shared test helpers: fixture listing source, recording sender.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use steam_topsellers::config::Settings;
use steam_topsellers::domain::error::{DeliveryError, ReportError};
use steam_topsellers::domain::ports::listing_source::ListingSource;
use steam_topsellers::domain::ports::message_sender::MessageSender;
use steam_topsellers::domain::ports::subscription_repository::SubscriptionRepository;
use steam_topsellers::domain::values::recipient_id::RecipientId;
use steam_topsellers::infrastructure::storage::json_subscriptions::JsonSubscriptionStore;
use steam_topsellers::TopSellers;

/// Serves a canned body (or error) and counts how often it was asked.
pub struct FixtureSource {
    response: Result<String, ReportError>,
    pub fetches: AtomicUsize,
}

impl FixtureSource {
    pub fn ok(body: String) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(body),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn failing(err: ReportError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(err),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch(&self) -> Result<String, ReportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// Records deliveries; fails for any recipient in `fail_for`.
#[derive(Default)]
pub struct RecordingSender {
    pub fail_for: HashSet<String>,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn failing_for(ids: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            fail_for: ids.iter().map(|s| s.to_string()).collect(),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, recipient: &RecipientId, text: &str) -> Result<(), DeliveryError> {
        if self.fail_for.contains(recipient.as_str()) {
            return Err(DeliveryError {
                recipient: recipient.to_string(),
                reason: "bot was kicked".into(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), text.to_string()));
        Ok(())
    }
}

/// Search-results body with `n` rows, alternating flat, discounted and free.
pub fn listing_body(n: usize) -> String {
    let rows: String = (1..=n)
        .map(|i| {
            let price = match i % 3 {
                0 => r#"<div class="search_price">免费开玩</div>"#.to_string(),
                1 => format!(r#"<div class="search_price">¥ {i}9,00</div>"#),
                _ => format!(
                    r#"<div class="search_price_discount_combined"><div class="search_discount"><span>-20%</span></div><div class="search_price discounted"><span><strike>¥ {i}0,00</strike></span><br>¥ {i},50</div></div>"#
                ),
            };
            format!(
                r##"<a class="search_result_row" href="#"><span class="title">Game {i}</span>{price}</a>"##
            )
        })
        .collect();
    serde_json::json!({ "success": 1, "results_html": rows }).to_string()
}

pub fn rid(raw: &str) -> RecipientId {
    RecipientId::new(raw).unwrap()
}

pub fn store_at(dir: &tempfile::TempDir) -> Arc<JsonSubscriptionStore> {
    Arc::new(JsonSubscriptionStore::load(dir.path().join("subs.json"), &[]))
}

pub fn app(
    source: Arc<FixtureSource>,
    store: Arc<dyn SubscriptionRepository>,
    sender: Arc<RecordingSender>,
) -> TopSellers {
    TopSellers::with_providers(Settings::default(), source, store, sender)
}
