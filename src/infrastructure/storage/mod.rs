pub mod json_subscriptions;
