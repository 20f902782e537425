//! Wire types for the GitHub user events feed.
//!
//! Only push events carry a meaningful payload for counting. Other event kinds
//! have unrelated payload shapes, so every push field decodes leniently.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::Deserialize;

use crate::error::FetchError;

/// Event kind of a push on the feed.
pub const PUSH_EVENT: &str = "PushEvent";

/// Refs whose commits count toward the daily total.
pub const PRIMARY_REFS: [&str; 2] = ["refs/heads/master", "refs/heads/main"];

/// One entry of `GET /users/{username}/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub actor: Option<Actor>,

    #[serde(default)]
    pub repo: Option<Repo>,

    /// RFC 3339 timestamp, kept raw so a bad value surfaces as its own error.
    pub created_at: String,

    #[serde(default)]
    pub payload: PushPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// Push-specific part of an event payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub push_id: Option<i64>,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,

    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub sha: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

impl Event {
    /// Parses `created_at` as a timezone-aware instant.
    pub fn created_at(&self) -> Result<DateTime<FixedOffset>, FetchError> {
        DateTime::parse_from_rfc3339(&self.created_at).map_err(|source| FetchError::Timestamp {
            event_id: self.id.clone(),
            value: self.created_at.clone(),
            source,
        })
    }

    /// Calendar date of the event as seen in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> Result<NaiveDate, FetchError> {
        Ok(self.created_at()?.with_timezone(tz).date_naive())
    }

    /// True for a push to `master` or `main`.
    pub fn is_primary_push(&self) -> bool {
        self.kind == PUSH_EVENT
            && self
                .payload
                .git_ref
                .as_deref()
                .is_some_and(|r| PRIMARY_REFS.contains(&r))
    }
}
