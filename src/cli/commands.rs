use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "steam-topsellers", about = "Steam top-sellers report with daily subscriptions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current top sellers
    Report {
        /// Number of entries (clamped to 1-25, defaults to default_top_num)
        #[arg(long, allow_hyphen_values = true)]
        count: Option<i64>,
        /// Print the report as JSON instead of chat text
        #[arg(long)]
        json: bool,
    },
    /// Subscribe a conversation to the daily report
    Subscribe {
        /// Session id, e.g. aiocqhttp:GroupMessage:123456
        origin: String,
    },
    /// Unsubscribe a conversation
    Unsubscribe { origin: String },
    /// List subscribed conversations
    List,
    /// Run the daily fan-out once, printing each delivery
    Fanout,
    /// Dispatch a raw chat command as if sent from a conversation
    Chat {
        text: String,
        #[arg(long)]
        origin: String,
        /// Treat the sender as an administrator
        #[arg(long)]
        admin: bool,
    },
    /// Schedule the daily report at remind_time and wait for Ctrl-C
    Run,
}
