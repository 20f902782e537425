//! HTTP access to the public events feed.

use std::future::Future;

use reqwest::{Client, header};
use tracing::debug;

use crate::{Event, FetchError, PAGE_SIZE};

/// Public GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can hand out pages of a user's event feed, newest first.
pub trait EventSource {
    /// Returns page `page` (1-based) of at most [`PAGE_SIZE`] events.
    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<Vec<Event>, FetchError>> + Send;
}

/// Events feed of one user on a GitHub-compatible API.
#[derive(Debug, Clone)]
pub struct GithubEvents {
    client: Client,
    api_base: String,
    username: String,
    token: Option<String>,
}

impl GithubEvents {
    pub fn new(
        api_base: impl Into<String>,
        username: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            username: username.into(),
            token,
        })
    }

    fn events_url(&self) -> String {
        format!(
            "{}/users/{}/events",
            self.api_base.trim_end_matches('/'),
            self.username
        )
    }
}

impl EventSource for GithubEvents {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Event>, FetchError> {
        let mut request = self
            .client
            .get(self.events_url())
            .query(&[("per_page", PAGE_SIZE), ("page", page)])
            .header(header::ACCEPT, ACCEPT_V3);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { page, status });
        }

        let body = response.text().await?;
        let events: Vec<Event> =
            serde_json::from_str(&body).map_err(|source| FetchError::Decode { page, source })?;

        debug!(user = %self.username, page, events = events.len(), "Fetched events page");
        Ok(events)
    }
}
