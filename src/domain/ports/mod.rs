pub mod listing_source;
pub mod message_sender;
pub mod subscription_repository;
