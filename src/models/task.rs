use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TaskError;

/// Current time, truncated to whole seconds so in-memory values always
/// round-trip through the wire encoding unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Todo,
    Progress,
    Blocked,
    Abandon,
    Done,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Self::Todo,
        Self::Progress,
        Self::Blocked,
        Self::Abandon,
        Self::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Progress => "progress",
            Self::Blocked => "blocked",
            Self::Abandon => "abandon",
            Self::Done => "done",
        }
    }

    /// Parse gateway from untrusted string input (CLI flags, frontmatter).
    pub fn parse(s: &str) -> Result<Self, TaskError> {
        match s {
            "todo" => Ok(Self::Todo),
            "progress" => Ok(Self::Progress),
            "blocked" => Ok(Self::Blocked),
            "abandon" => Ok(Self::Abandon),
            "done" => Ok(Self::Done),
            _ => Err(TaskError::invalid_status(s)),
        }
    }

    /// Closed tasks are the ones `clean` sweeps away.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Done | Self::Abandon)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Task,
    Bug,
    Feature,
}

impl TaskType {
    pub const ALL: [TaskType; 3] = [Self::Task, Self::Bug, Self::Feature];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }

    /// Parse gateway from untrusted string input (CLI flags, frontmatter).
    pub fn parse(s: &str) -> Result<Self, TaskError> {
        match s {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(TaskError::invalid_type(s)),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable annotation appended to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<Note>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: TaskType, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            title: title.into(),
            description: None,
            kind,
            status: Status::Todo,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>, now: DateTime<Utc>) {
        self.title = title.into();
        self.touch(now);
    }

    pub fn set_description(&mut self, description: impl Into<String>, now: DateTime<Utc>) {
        self.description = Some(description.into());
        self.touch(now);
    }

    /// Set or clear the description. Used by the editor flow, where an empty
    /// document body means "no description".
    pub fn set_description_value(&mut self, description: Option<String>, now: DateTime<Utc>) {
        self.description = description;
        self.touch(now);
    }

    /// Append a label unless it is already present (case-sensitive). Adding a
    /// duplicate is a complete no-op: `updated_at` is left alone.
    pub fn add_label(&mut self, label: impl Into<String>, now: DateTime<Utc>) {
        let label = label.into();
        if self.has_label(&label) {
            return;
        }
        self.labels.push(label);
        self.touch(now);
    }

    /// Replace the label set wholesale. No de-duplication happens here;
    /// callers that accept free-form input normalize first.
    pub fn set_labels(&mut self, labels: Vec<String>, now: DateTime<Utc>) {
        self.labels = labels;
        self.touch(now);
    }

    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    pub fn set_kind(&mut self, kind: TaskType, now: DateTime<Utc>) {
        self.kind = kind;
        self.touch(now);
    }

    /// Append a note. Content is expected to be trimmed and non-empty by the
    /// caller.
    pub fn add_note(&mut self, id: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) {
        self.notes.push(Note {
            id: id.into(),
            created_at: now,
            content: content.into(),
        });
        self.touch(now);
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Tolerate `labels: null` / `notes: null` in stored records by substituting
/// an empty sequence.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC3339 UTC at second precision, the exchange format for every stored
/// timestamp.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
