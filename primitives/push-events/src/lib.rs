//! Push Events - Today's Commits From A User's Event Feed
//!
//! Pages through `GET /users/{username}/events` newest first and collects the
//! commits of push events to `master` or `main` that happened on the current
//! local calendar date.
//!
//! # Stopping Rule
//!
//! The feed is ordered newest first, so the first event whose local date is not
//! today ends pagination: the rest of that page is skipped and no further page
//! is requested. An empty page ends pagination as well.
//!
//! # Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), push_events::FetchError> {
//! use push_events::{DEFAULT_API_BASE, GithubEvents, fetch_todays_commits};
//!
//! let source = GithubEvents::new(DEFAULT_API_BASE, "octocat", None)?;
//! let today = chrono::Local::now().date_naive();
//! let commits = fetch_todays_commits(&source, today, &chrono::Local).await?;
//! println!("{} commits today", commits.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod model;

use chrono::{NaiveDate, TimeZone};
use tracing::{debug, info};

pub use client::{DEFAULT_API_BASE, EventSource, GithubEvents};
pub use error::FetchError;
pub use model::{Actor, Author, Commit, Event, PRIMARY_REFS, PUSH_EVENT, PushPayload, Repo};

/// Events requested per page.
pub const PAGE_SIZE: u32 = 10;

/// Collects every commit pushed to a primary branch on `today` (as seen in `tz`).
///
/// Commits are returned in page order, then event order, without de-duplication.
/// Any error discards what earlier pages produced.
pub async fn fetch_todays_commits<S, Tz>(
    source: &S,
    today: NaiveDate,
    tz: &Tz,
) -> Result<Vec<Commit>, FetchError>
where
    S: EventSource,
    Tz: TimeZone,
{
    let mut commits = Vec::new();

    for page in 1.. {
        let events = source.fetch_page(page).await?;
        if events.is_empty() {
            debug!(page, "Empty events page, stopping");
            break;
        }

        if !collect_page(&events, today, tz, &mut commits)? {
            debug!(page, "Reached an event before today, stopping");
            break;
        }
    }

    info!(count = commits.len(), %today, "Counted today's primary-branch commits");
    Ok(commits)
}

/// Appends qualifying commits from one page. Returns `false` once an event
/// outside `today` is seen.
fn collect_page<Tz: TimeZone>(
    events: &[Event],
    today: NaiveDate,
    tz: &Tz,
    commits: &mut Vec<Commit>,
) -> Result<bool, FetchError> {
    for event in events {
        if event.local_date(tz)? != today {
            return Ok(false);
        }
        if event.is_primary_push() {
            commits.extend(event.payload.commits.iter().cloned());
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    /// Serves canned pages and records which pages were asked for.
    struct CannedPages {
        pages: Vec<Result<Vec<Event>, String>>,
        requested: Mutex<Vec<u32>>,
    }

    impl CannedPages {
        fn new(pages: Vec<Vec<Value>>) -> Result<Self, serde_json::Error> {
            let pages: Vec<Result<Vec<Event>, String>> = pages
                .into_iter()
                .map(|p| serde_json::from_value(Value::Array(p)).map(Ok))
                .collect::<Result<_, _>>()?;
            Ok(Self {
                pages,
                requested: Mutex::new(Vec::new()),
            })
        }

        fn with_broken_page(mut self, body: &str) -> Self {
            self.pages.push(Err(body.to_string()));
            self
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl EventSource for CannedPages {
        async fn fetch_page(&self, page: u32) -> Result<Vec<Event>, FetchError> {
            if let Ok(mut requested) = self.requested.lock() {
                requested.push(page);
            }
            match self.pages.get(page as usize - 1) {
                None => Ok(Vec::new()),
                Some(Ok(events)) => Ok(events.clone()),
                Some(Err(body)) => serde_json::from_str(body)
                    .map_err(|source| FetchError::Decode { page, source }),
            }
        }
    }

    fn push(id: &str, at: &str, git_ref: &str, shas: &[&str]) -> Value {
        let commits: Vec<Value> = shas
            .iter()
            .map(|sha| {
                json!({
                    "sha": sha,
                    "message": "m",
                    "url": "u",
                    "author": { "name": "n", "email": "e" }
                })
            })
            .collect();
        json!({
            "id": id,
            "type": "PushEvent",
            "created_at": at,
            "payload": { "ref": git_ref, "commits": commits }
        })
    }

    fn other(id: &str, kind: &str, at: &str) -> Value {
        json!({ "id": id, "type": kind, "created_at": at, "payload": {} })
    }

    fn today() -> Result<NaiveDate, &'static str> {
        NaiveDate::from_ymd_opt(2026, 10, 19).ok_or("bad date")
    }

    fn shas(commits: &[Commit]) -> Vec<&str> {
        commits.iter().map(|c| c.sha.as_str()).collect()
    }

    #[tokio::test]
    async fn counts_primary_pushes_across_pages_until_yesterday() -> TestResult {
        let source = CannedPages::new(vec![
            vec![
                push("1", "2026-10-19T20:00:00Z", "refs/heads/main", &["a", "b"]),
                other("2", "IssuesEvent", "2026-10-19T19:00:00Z"),
                push("3", "2026-10-19T18:00:00Z", "refs/heads/feature", &["x"]),
            ],
            vec![
                push("4", "2026-10-19T09:00:00Z", "refs/heads/master", &["c"]),
                push("5", "2026-10-18T23:59:59Z", "refs/heads/main", &["old"]),
                push("6", "2026-10-18T22:00:00Z", "refs/heads/main", &["older"]),
            ],
            vec![push("7", "2026-10-17T10:00:00Z", "refs/heads/main", &["never"])],
        ])?;

        let commits = fetch_todays_commits(&source, today()?, &Utc).await?;

        assert_eq!(shas(&commits), vec!["a", "b", "c"]);
        assert_eq!(source.requested(), vec![1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn stops_on_first_page_when_nothing_happened_today() -> TestResult {
        let source = CannedPages::new(vec![
            vec![push("1", "2026-10-18T20:00:00Z", "refs/heads/main", &["a"])],
            vec![push("2", "2026-10-18T10:00:00Z", "refs/heads/main", &["b"])],
        ])?;

        let commits = fetch_todays_commits(&source, today()?, &Utc).await?;

        assert!(commits.is_empty());
        assert_eq!(source.requested(), vec![1]);
        Ok(())
    }

    #[tokio::test]
    async fn empty_page_ends_an_all_today_feed() -> TestResult {
        let source = CannedPages::new(vec![
            vec![push("1", "2026-10-19T20:00:00Z", "refs/heads/main", &["a"])],
            vec![push("2", "2026-10-19T10:00:00Z", "refs/heads/main", &["b"])],
        ])?;

        let commits = fetch_todays_commits(&source, today()?, &Utc).await?;

        assert_eq!(shas(&commits), vec!["a", "b"]);
        assert_eq!(source.requested(), vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_commits_are_kept() -> TestResult {
        let source = CannedPages::new(vec![vec![
            push("1", "2026-10-19T20:00:00Z", "refs/heads/main", &["a"]),
            push("2", "2026-10-19T19:00:00Z", "refs/heads/master", &["a"]),
        ]])?;

        let commits = fetch_todays_commits(&source, today()?, &Utc).await?;

        assert_eq!(shas(&commits), vec!["a", "a"]);
        Ok(())
    }

    #[tokio::test]
    async fn out_of_order_feed_stops_at_first_older_event() -> TestResult {
        // A today event after an older one is never reached.
        let source = CannedPages::new(vec![
            vec![
                push("1", "2026-10-19T20:00:00Z", "refs/heads/main", &["a"]),
                push("2", "2026-10-18T20:00:00Z", "refs/heads/main", &["old"]),
                push("3", "2026-10-19T21:00:00Z", "refs/heads/main", &["late"]),
            ],
            vec![push("4", "2026-10-19T22:00:00Z", "refs/heads/main", &["later"])],
        ])?;

        let commits = fetch_todays_commits(&source, today()?, &Utc).await?;

        assert_eq!(shas(&commits), vec!["a"]);
        assert_eq!(source.requested(), vec![1]);
        Ok(())
    }

    #[tokio::test]
    async fn day_boundary_uses_the_supplied_zone() -> TestResult {
        // 23:30 UTC on the 18th is already the 19th in UTC+9.
        let tokyo = chrono::FixedOffset::east_opt(9 * 3600).ok_or("bad offset")?;
        let source = CannedPages::new(vec![vec![
            push("1", "2026-10-18T23:30:00Z", "refs/heads/main", &["a"]),
            push("2", "2026-10-18T14:00:00Z", "refs/heads/main", &["b"]),
        ]])?;

        let commits = fetch_todays_commits(&source, today()?, &tokyo).await?;

        assert_eq!(shas(&commits), vec!["a"]);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_later_page_discards_earlier_results() -> TestResult {
        let source = CannedPages::new(vec![vec![push(
            "1",
            "2026-10-19T20:00:00Z",
            "refs/heads/main",
            &["a"],
        )]])?
        .with_broken_page("{\"message\": \"API rate limit exceeded\"}");

        let result = fetch_todays_commits(&source, today()?, &Utc).await;

        assert!(matches!(result, Err(FetchError::Decode { page: 2, .. })));
        Ok(())
    }

    #[tokio::test]
    async fn unparseable_timestamp_aborts() -> TestResult {
        let source = CannedPages::new(vec![vec![
            push("1", "2026-10-19T20:00:00Z", "refs/heads/main", &["a"]),
            push("2", "19/10/2026", "refs/heads/main", &["b"]),
        ]])?;

        let result = fetch_todays_commits(&source, today()?, &Utc).await;

        assert!(matches!(
            result,
            Err(FetchError::Timestamp { ref event_id, .. }) if event_id == "2"
        ));
        Ok(())
    }
}
