use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::TimestampError;
use crate::lineage::auth::CredentialsContext;

/// Free-form attribute map attached to processes and runs.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Settings that shape an interactive session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub credentials_context: CredentialsContext,
    pub owner_identity: String,
    pub allowed_regions: Vec<String>,
    pub rollback_on_failure: bool,
    pub clear_screen: bool,
}

/// Settings for the REST backend.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub poll_interval: Duration,
    /// Billed through `x-goog-user-project` when set; otherwise the
    /// credentials' own project pays.
    pub quota_project: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    SourceTypeUnspecified,
    Custom,
    Bigquery,
    DataFusion,
    Composer,
    LookerStudio,
    Dataproc,
    #[serde(other)]
    Other,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceType::SourceTypeUnspecified => "SOURCE_TYPE_UNSPECIFIED",
            SourceType::Custom => "CUSTOM",
            SourceType::Bigquery => "BIGQUERY",
            SourceType::DataFusion => "DATA_FUSION",
            SourceType::Composer => "COMPOSER",
            SourceType::LookerStudio => "LOOKER_STUDIO",
            SourceType::Dataproc => "DATAPROC",
            SourceType::Other => "OTHER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub source_type: SourceType,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Started,
    Completed,
    Failed,
    Aborted,
}

impl RunState {
    pub const ALL: [RunState; 4] = [
        RunState::Started,
        RunState::Completed,
        RunState::Failed,
        RunState::Aborted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Started => "STARTED",
            RunState::Completed => "COMPLETED",
            RunState::Failed => "FAILED",
            RunState::Aborted => "ABORTED",
        }
    }

    /// Parse operator input: blank means COMPLETED, otherwise case-insensitive.
    pub fn from_input(input: &str) -> Option<RunState> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Some(RunState::Completed);
        }
        trimmed.parse().ok()
    }
}

impl FromStr for RunState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        RunState::ALL
            .into_iter()
            .find(|state| state.as_str() == upper)
            .ok_or_else(|| format!("unknown run state: {s}"))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub state: RunState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReference {
    pub fully_qualified_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLink {
    pub source: EntityReference,
    pub target: EntityReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub links: Vec<EventLink>,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Status carried by a failed long-running operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Long-running operation handle returned by process deletion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationStatus>,
}

/// The synthetic one-hour window stamped on runs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl ExecutionWindow {
    /// Window ending at `now`, truncated to whole milliseconds.
    pub fn ending_at(now: OffsetDateTime) -> Self {
        let millis = now.millisecond();
        let end = now
            .replace_nanosecond(u32::from(millis) * 1_000_000)
            .unwrap_or(now);
        let start = end - time::Duration::HOUR;
        Self { start, end }
    }

    pub fn last_hour() -> Self {
        Self::ending_at(OffsetDateTime::now_utc())
    }

    pub fn start_str(&self) -> Result<String, TimestampError> {
        format_timestamp(self.start)
    }

    pub fn end_str(&self) -> Result<String, TimestampError> {
        format_timestamp(self.end)
    }
}

/// Render a UTC timestamp as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, TimestampError> {
    let fmt = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    let utc = ts.to_offset(time::UtcOffset::UTC);
    if !(0..=9999).contains(&utc.year()) {
        return Err(TimestampError::YearOutOfRange(utc.year()));
    }
    Ok(utc.format(&fmt)?)
}

/// Render an attribute value the way an operator typed it.
pub fn attribute_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
