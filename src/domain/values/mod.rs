pub mod price;
pub mod recipient_id;
pub mod report_limit;
pub mod schedule_spec;
