//! One fetch-and-toggle pass.
//!
//! Every ambient input (date, zone, privilege) is passed in so a pass can be
//! replayed against canned pages and a scratch hosts file.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone};
use hosts_block::{EntryState, HostsFile, Transition};
use push_events::{EventSource, fetch_todays_commits};
use tracing::info;

use crate::{config::Config, decision::Decision, privilege::Privilege};

/// Result of [`Check::enforce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Blocked,
    AlreadyBlocked,
    Allowed,
    AlreadyAllowed,
    /// Nothing was attempted: the process lacks root.
    NeedPrivilege,
}

impl Outcome {
    /// Process exit status for a finished pass.
    pub fn exit_status(self) -> u8 {
        match self {
            Self::NeedPrivilege => 1,
            Self::Blocked | Self::AlreadyBlocked | Self::Allowed | Self::AlreadyAllowed => 0,
        }
    }
}

pub struct Check<'a, S, Tz> {
    pub config: &'a Config,
    pub source: &'a S,
    pub hosts: &'a HostsFile,
    pub privilege: Privilege,
    pub today: NaiveDate,
    pub tz: &'a Tz,
}

impl<S, Tz> Check<'_, S, Tz>
where
    S: EventSource,
    Tz: TimeZone,
{
    async fn decide(&self) -> Result<(usize, Decision)> {
        let commits = fetch_todays_commits(self.source, self.today, self.tz)
            .await
            .with_context(|| {
                format!("failed to fetch today's commits for {}", self.config.username)
            })?;
        let count = commits.len();
        let decision = Decision::from_count(count, self.config.limit);

        info!(
            user = %self.config.username,
            count,
            limit = self.config.limit,
            ?decision,
            "Checked commit threshold"
        );
        Ok((count, decision))
    }

    /// Fetches today's count and moves the hosts entry to match it.
    pub async fn enforce(&self, out: &mut impl Write) -> Result<Outcome> {
        let (_, decision) = self.decide().await?;
        let domain = self.hosts.domain();

        match decision {
            Decision::Block => writeln!(out, "Over threshold, prohibiting more commits...")?,
            Decision::Allow => writeln!(out, "Allowing commits to {domain}...")?,
        }

        if !self.privilege.is_elevated() {
            writeln!(out, "Need root permission.")?;
            return Ok(Outcome::NeedPrivilege);
        }

        let outcome = match decision {
            Decision::Block => match self.hosts.disable()? {
                Transition::Applied { .. } => {
                    writeln!(out, "Prohibited {domain}.")?;
                    Outcome::Blocked
                }
                Transition::Unchanged(_) => {
                    writeln!(out, "Already prohibited {domain}.")?;
                    Outcome::AlreadyBlocked
                }
            },
            Decision::Allow => match self.hosts.enable()? {
                Transition::Applied { .. } => {
                    writeln!(out, "Allowed {domain}.")?;
                    Outcome::Allowed
                }
                Transition::Unchanged(_) => {
                    writeln!(out, "Already allowed {domain}.")?;
                    Outcome::AlreadyAllowed
                }
            },
        };

        Ok(outcome)
    }

    /// Prints count, decision and current entry without writing anything.
    pub async fn status(&self, out: &mut impl Write) -> Result<()> {
        let (count, decision) = self.decide().await?;
        let state = self.hosts.state()?;
        let domain = self.hosts.domain();

        writeln!(
            out,
            "{}: {count} commit(s) to master/main today, limit {}",
            self.config.username, self.config.limit
        )?;
        writeln!(
            out,
            "Decision: {}",
            match decision {
                Decision::Block => "prohibit",
                Decision::Allow => "allow",
            }
        )?;
        writeln!(
            out,
            "{domain}: {}",
            match state {
                None => "no managed entry",
                Some(EntryState::Enabled) => "allowed",
                Some(EntryState::Disabled) => "prohibited",
            }
        )?;
        Ok(())
    }
}
