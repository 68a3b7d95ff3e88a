pub mod build_report;
pub mod commands;
pub mod fanout;
pub mod scheduler;
