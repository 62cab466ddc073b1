use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EcobotError;

// =============================================================================
// Environmental records
// =============================================================================

/// Kind of environmental measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Air,
    Water,
    Temperature,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [RecordType::Air, RecordType::Water, RecordType::Temperature];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Air => "air",
            RecordType::Water => "water",
            RecordType::Temperature => "temperature",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = EcobotError;

    /// Accepts the stored English names and the Portuguese labels used by
    /// the dashboard filters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "air" | "ar" => Ok(RecordType::Air),
            "water" | "agua" | "água" => Ok(RecordType::Water),
            "temperature" | "temperatura" => Ok(RecordType::Temperature),
            other => Err(EcobotError::InvalidRecord(format!(
                "unknown record type: {}",
                other
            ))),
        }
    }
}

/// Condition classification of a measurement, ordered by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Good,
    Moderate,
    Poor,
    Hazardous,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Good => "good",
            RecordStatus::Moderate => "moderate",
            RecordStatus::Poor => "poor",
            RecordStatus::Hazardous => "hazardous",
        }
    }

    /// Severity rank used for status sorting (good = 0 .. hazardous = 3).
    pub fn severity(&self) -> u8 {
        match self {
            RecordStatus::Good => 0,
            RecordStatus::Moderate => 1,
            RecordStatus::Poor => 2,
            RecordStatus::Hazardous => 3,
        }
    }

    /// Whether the dashboard raises an alert for this status.
    pub fn is_critical(&self) -> bool {
        matches!(self, RecordStatus::Poor | RecordStatus::Hazardous)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = EcobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(RecordStatus::Good),
            "moderate" => Ok(RecordStatus::Moderate),
            "poor" => Ok(RecordStatus::Poor),
            "hazardous" => Ok(RecordStatus::Hazardous),
            other => Err(EcobotError::InvalidRecord(format!(
                "unknown record status: {}",
                other
            ))),
        }
    }
}

/// A single environmental measurement at a monitoring point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: f64,
    pub unit: String,
    pub location: String,
    pub status: RecordStatus,
    pub recorded_at: DateTime<Utc>,
    /// Portuguese weekday label as stored upstream (e.g. "Segunda-feira").
    #[serde(default, alias = "dia_da_semana")]
    pub day_of_week: Option<String>,
}

impl EnvironmentalRecord {
    /// Build a record whose weekday label is derived from `recorded_at`.
    pub fn new(
        record_type: RecordType,
        value: f64,
        unit: impl Into<String>,
        location: impl Into<String>,
        status: RecordStatus,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            record_type,
            value,
            unit: unit.into(),
            location: location.into(),
            status,
            recorded_at,
            day_of_week: Some(weekday_label(recorded_at.weekday()).to_string()),
        }
    }

    /// Stored weekday label, or one derived from `recorded_at` when missing.
    pub fn weekday(&self) -> String {
        self.day_of_week
            .clone()
            .unwrap_or_else(|| weekday_label(self.recorded_at.weekday()).to_string())
    }
}

/// Portuguese weekday label as shown in the dashboard day filter.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Domingo",
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// One message in a chat transcript. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    /// Position in the session transcript, starting at 0 for the welcome turn.
    pub sequence: u64,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    pub has_links: bool,
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// A registered dashboard user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// An authenticated session returned by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user: User,
    pub access_token: String,
    pub started_at: DateTime<Utc>,
}

// =============================================================================
// Forum
// =============================================================================

/// A community discussion thread.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes: u32,
    /// Oldest first.
    #[serde(default)]
    pub comments: Vec<ForumComment>,
    pub tags: Vec<String>,
}

/// A reply attached to a [`ForumPost`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}
