use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Display string for free-to-play titles.
pub const FREE_TO_PLAY: &str = "Free to Play";

/// Shown when a listing row carries no price element at all.
pub const PRICE_PLACEHOLDER: &str = "--";

const FREE_MARKERS: [&str; 2] = ["免费", "Free"];

/// A storefront price fragment after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceKind {
    Free,
    Discounted {
        percent: String,
        original: String,
        final_price: String,
    },
    Flat(String),
}

fn discount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // -10%¥ 28.49¥ 25.64
        Regex::new(r"-(\d+)%\s*(¥\s*[\d.]+)\s*(¥\s*[\d.]+)").expect("valid discount regex")
    })
}

impl PriceKind {
    /// Classify a raw price fragment. The comma decimal separator is
    /// rewritten to a dot before any rule runs.
    pub fn classify(raw: &str) -> Self {
        let text = raw.trim().replace(',', ".");

        if FREE_MARKERS.iter().any(|m| text.contains(m)) {
            return PriceKind::Free;
        }

        if let Some(caps) = discount_pattern().captures(&text) {
            return PriceKind::Discounted {
                percent: caps[1].to_string(),
                original: caps[2].trim().to_string(),
                final_price: caps[3].trim().to_string(),
            };
        }

        PriceKind::Flat(text)
    }
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceKind::Free => write!(f, "{FREE_TO_PLAY}"),
            PriceKind::Discounted {
                percent,
                original,
                final_price,
            } => write!(f, "{final_price} (original: {original}, -{percent}%)"),
            PriceKind::Flat(text) => write!(f, "{text}"),
        }
    }
}

/// Normalize a raw price fragment into its canonical display form.
/// Never fails: anything unrecognised comes back trimmed.
pub fn normalize(raw: &str) -> String {
    PriceKind::classify(raw).to_string()
}
