use serde::{Deserialize, Serialize};

/// Catalog topic. One variant per menu entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicKey {
    Air,
    Water,
    Temperature,
    FaunaFlora,
    Conservation,
    Links,
    Help,
}

impl TopicKey {
    /// Menu order.
    pub const ALL: [TopicKey; 7] = [
        TopicKey::Air,
        TopicKey::Water,
        TopicKey::Temperature,
        TopicKey::FaunaFlora,
        TopicKey::Conservation,
        TopicKey::Links,
        TopicKey::Help,
    ];

    /// The key a user types to reach this topic.
    pub fn key(&self) -> &'static str {
        match self {
            TopicKey::Air => "1",
            TopicKey::Water => "2",
            TopicKey::Temperature => "3",
            TopicKey::FaunaFlora => "4",
            TopicKey::Conservation => "5",
            TopicKey::Links => "6",
            TopicKey::Help => "ajuda",
        }
    }
}

/// Outcome of matching user text against the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Resolution {
    Topic(TopicKey),
    ShowMenu,
    /// No rule matched; carries the text as submitted.
    Unmatched(String),
}

/// Rendered engine output for one user message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub text: String,
    /// True iff `text` contains `url:` in any case.
    pub has_links: bool,
    pub resolution: Resolution,
}

/// Quick-access menu entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub key: String,
    pub title: String,
}
