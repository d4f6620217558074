use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static EMBEDDED_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Issued automatically on a late check-in.
    Late,
    /// Issued by an administrator with a free-text reason.
    Manual,
}

/// A yellow card. The `date` field is what the daily cap compares against;
/// `note` is display text only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCard")]
pub struct YellowCard {
    pub date: Option<NaiveDate>,
    pub kind: CardKind,
    pub note: String,
}

impl YellowCard {
    pub fn late(date: NaiveDate, note: String) -> Self {
        Self {
            date: Some(date),
            kind: CardKind::Late,
            note,
        }
    }

    pub fn manual(date: NaiveDate, note: String) -> Self {
        Self {
            date: Some(date),
            kind: CardKind::Manual,
            note,
        }
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }

    /// Older ledgers stored cards as bare strings with the date embedded in
    /// the text; the first `YYYY-MM-DD` found becomes the card date.
    pub fn from_legacy_text(text: &str) -> Self {
        let date = EMBEDDED_DATE
            .find(text)
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());
        let kind = if text.trim_start().starts_with("Manual yellow card") {
            CardKind::Manual
        } else {
            CardKind::Late
        };
        Self {
            date,
            kind,
            note: text.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct CardFields {
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default = "default_kind")]
    kind: CardKind,
    #[serde(default)]
    note: String,
}

fn default_kind() -> CardKind {
    CardKind::Late
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCard {
    Legacy(String),
    Structured(CardFields),
}

impl From<RawCard> for YellowCard {
    fn from(raw: RawCard) -> Self {
        match raw {
            RawCard::Legacy(text) => YellowCard::from_legacy_text(&text),
            RawCard::Structured(f) => YellowCard {
                date: f.date,
                kind: f.kind,
                note: f.note,
            },
        }
    }
}
