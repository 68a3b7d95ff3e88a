use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const GROUP_KIND: &str = "GroupMessage";
const DIRECT_KIND: &str = "FriendMessage";

/// Separator between a sender qualifier and the group id in per-sender
/// group sessions, e.g. `aiocqhttp:GroupMessage:10001_555`.
const SENDER_QUALIFIER_SEP: char = '_';

/// Canonical delivery destination: `platform:Kind:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(String);

impl RecipientId {
    /// Canonicalize a full session id. Group sessions lose any sender
    /// qualifier so that the group itself is the subscription unit.
    pub fn new(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("Recipient id must not be empty".into());
        }

        let mut parts = raw.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(platform), Some(GROUP_KIND), Some(id)) => {
                let group = id
                    .rsplit_once(SENDER_QUALIFIER_SEP)
                    .map(|(_, group)| group)
                    .unwrap_or(id);
                if group.is_empty() {
                    return Err(format!("Group id missing in recipient: {raw}"));
                }
                Ok(Self(format!("{platform}:{GROUP_KIND}:{group}")))
            }
            _ => Ok(Self(raw.to_string())),
        }
    }

    /// Build a group recipient from a configured id. Ids that already carry
    /// a platform prefix are taken as full session ids.
    pub fn group(platform: &str, raw: &str) -> Result<Self, String> {
        Self::with_kind(platform, GROUP_KIND, raw)
    }

    /// Build a direct-conversation recipient from a configured sender id.
    pub fn direct(platform: &str, raw: &str) -> Result<Self, String> {
        Self::with_kind(platform, DIRECT_KIND, raw)
    }

    fn with_kind(platform: &str, kind: &str, raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.contains(':') {
            Self::new(raw)
        } else if raw.is_empty() {
            Err("Recipient id must not be empty".into())
        } else {
            Self::new(&format!("{platform}:{kind}:{raw}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_group(&self) -> bool {
        self.0.split(':').nth(1) == Some(GROUP_KIND)
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
