//! Shared data types for the application.

use crate::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an item was reported missing or handed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Lost => f.write_str("lost"),
            ItemKind::Found => f.write_str("found"),
        }
    }
}

/// Claim state of an item. Only ever moves from `Unclaimed` to `Claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Unclaimed,
    Claimed,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Unclaimed => f.write_str("unclaimed"),
            ItemStatus::Claimed => f.write_str("claimed"),
        }
    }
}

/// Free-text details collected from the reporter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub location: String,
}

/// One reported lost or found item, as persisted in the snapshot.
///
/// Fields are private: after creation the only permitted change is the
/// single unclaimed to claimed transition in [`ItemRecord::mark_claimed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(rename = "type")]
    kind: ItemKind,
    name: String,
    description: String,
    location: String,
    /// Raw stored timestamp, canonical or legacy encoding.
    #[serde(rename = "date_time")]
    reported_at: String,
    status: ItemStatus,
    reporter: String,
}

impl ItemRecord {
    /// Create an unclaimed record stamped with `reported_at` in canonical form.
    pub fn new(
        kind: ItemKind,
        item: NewItem,
        reporter: impl Into<String>,
        reported_at: NaiveDateTime,
    ) -> Self {
        Self::with_raw_timestamp(kind, item, reporter, timestamp::format_canonical(&reported_at))
    }

    /// Create an unclaimed record carrying an already-encoded timestamp,
    /// e.g. one written by an older release in the ISO encoding.
    pub fn with_raw_timestamp(
        kind: ItemKind,
        item: NewItem,
        reporter: impl Into<String>,
        reported_at: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: item.name,
            description: item.description,
            location: item.location,
            reported_at: reported_at.into(),
            status: ItemStatus::Unclaimed,
            reporter: reporter.into(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The timestamp exactly as stored.
    pub fn raw_reported_at(&self) -> &str {
        &self.reported_at
    }

    /// The timestamp rendered through the normalizer.
    pub fn display_reported_at(&self) -> String {
        timestamp::normalize(&self.reported_at)
    }

    /// The report instant at whole-second granularity, if it parses.
    pub fn reported_instant(&self) -> Option<NaiveDateTime> {
        timestamp::parse_whole_seconds(&self.reported_at)
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn reporter(&self) -> &str {
        &self.reporter
    }

    pub fn is_unclaimed(&self) -> bool {
        self.status == ItemStatus::Unclaimed
    }

    /// Transition to `Claimed`. Returns false if the item was already claimed.
    pub fn mark_claimed(&mut self) -> bool {
        if self.is_unclaimed() {
            self.status = ItemStatus::Claimed;
            true
        } else {
            false
        }
    }
}

/// Display form of a record: identical fields, timestamp normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub kind: ItemKind,
    pub name: String,
    pub description: String,
    pub location: String,
    pub reported_at: String,
    pub status: ItemStatus,
    pub reporter: String,
}

impl From<&ItemRecord> for ItemView {
    fn from(record: &ItemRecord) -> Self {
        Self {
            kind: record.kind,
            name: record.name.clone(),
            description: record.description.clone(),
            location: record.location.clone(),
            reported_at: record.display_reported_at(),
            status: record.status,
            reporter: record.reporter.clone(),
        }
    }
}

impl fmt::Display for ItemView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} | at {} | {} | {} | reported by {}",
            self.kind,
            self.name,
            self.description,
            self.location,
            self.reported_at,
            self.status,
            self.reporter
        )
    }
}

/// Who is driving the current interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// Explicit session context handed to lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: Role::User,
        }
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: Role::Admin,
        }
    }
}
