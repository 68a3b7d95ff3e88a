use crate::application::build_report::BuildReportUseCase;
use crate::domain::ports::subscription_repository::SubscriptionRepository;
use crate::domain::values::recipient_id::RecipientId;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// On-demand report; `None` means the configured default count.
    Report { count: Option<i64> },
    Subscribe,
    Unsubscribe,
    ListSubscriptions,
}

impl Command {
    /// Recognise a chat message. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix('/').unwrap_or(text);
        let mut words = text.split_whitespace();
        let name = words.next()?;

        match name {
            "steam" | "steam热销" => Some(Command::Report {
                count: words.next().and_then(|n| n.parse().ok()),
            }),
            "steam_subscribe" | "订阅steam日报" => Some(Command::Subscribe),
            "steam_unsubscribe" | "取消订阅steam日报" => Some(Command::Unsubscribe),
            "steam_list" | "steam订阅列表" => Some(Command::ListSubscriptions),
            _ => None,
        }
    }
}

/// Who issued a command. `is_admin` comes from the caller's permission check.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub origin: String,
    pub is_admin: bool,
}

pub struct CommandDispatcher {
    builder: Arc<BuildReportUseCase>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    default_top_num: i64,
}

impl CommandDispatcher {
    pub fn new(
        builder: Arc<BuildReportUseCase>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        default_top_num: i64,
    ) -> Self {
        Self {
            builder,
            subscriptions,
            default_top_num,
        }
    }

    /// Execute a command and return the reply text.
    pub async fn dispatch(&self, ctx: &CommandContext, cmd: Command) -> String {
        match cmd {
            Command::Report { count } => {
                match self.builder.execute(count.unwrap_or(self.default_top_num)).await {
                    Ok(report) => report.render(),
                    Err(e) => e.user_message().to_string(),
                }
            }
            Command::Subscribe => match self.origin(ctx) {
                Some(id) if self.subscriptions.add(&id) => {
                    "Subscribed to the daily Steam top-sellers report.".into()
                }
                Some(_) => "This conversation is already subscribed.".into(),
                None => "Could not identify this conversation.".into(),
            },
            Command::Unsubscribe => match self.origin(ctx) {
                Some(id) if self.subscriptions.remove(&id) => {
                    "Unsubscribed from the daily Steam top-sellers report.".into()
                }
                Some(_) => "This conversation is not subscribed.".into(),
                None => "Could not identify this conversation.".into(),
            },
            Command::ListSubscriptions => {
                if !ctx.is_admin {
                    return "Only administrators can list subscriptions.".into();
                }
                let subscribed = self.subscriptions.list();
                if subscribed.is_empty() {
                    return "No subscriptions yet.".into();
                }
                let mut text = format!("Subscribed conversations ({}):", subscribed.len());
                for id in &subscribed {
                    text.push_str("\n- ");
                    text.push_str(id.as_str());
                }
                text
            }
        }
    }

    fn origin(&self, ctx: &CommandContext) -> Option<RecipientId> {
        RecipientId::new(&ctx.origin)
            .map_err(|e| warn!(origin = %ctx.origin, error = %e, "Unusable command origin"))
            .ok()
    }
}
