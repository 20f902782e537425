//! The managed hosts line and its two states.
//!
//! On disk the trailing word describes the *block*, while [`EntryState`]
//! describes the *domain*:
//!
//! ```text
//! 127.0.0.1 github.com # smgithub enabled      <- EntryState::Disabled (blocked)
//! # 127.0.0.1 github.com # smgithub disabled   <- EntryState::Enabled (resolves normally)
//! ```

use std::fmt;

/// Substring identifying the line this tool owns.
pub const TAG: &str = "smgithub";

/// Address the domain is pointed at while blocked.
pub const LOOPBACK: &str = "127.0.0.1";

const BLOCK_ACTIVE: &str = "enabled";
const BLOCK_INACTIVE: &str = "disabled";

/// State of the domain as controlled by the managed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    /// Block neutralized; the mapping line is commented out.
    Enabled,
    /// Domain forced to [`LOOPBACK`] by an active mapping line.
    Disabled,
}

impl EntryState {
    /// Renders the managed line for `domain` in this state.
    pub fn render(self, domain: &str) -> String {
        match self {
            Self::Disabled => format!("{LOOPBACK} {domain} # {TAG} {BLOCK_ACTIVE}"),
            Self::Enabled => format!("# {LOOPBACK} {domain} # {TAG} {BLOCK_INACTIVE}"),
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// How a single hosts line relates to the managed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// No tag; the line belongs to someone else.
    Unmanaged,
    Managed(EntryState),
    /// Tagged, but the word after the tag is not a known state.
    Broken,
}

/// Classifies one hosts line by the word following [`TAG`].
///
/// The tag must stand as its own word; `smgithubenabled` is broken.
pub fn classify(line: &str) -> Marker {
    let Some((_, rest)) = line.split_once(TAG) else {
        return Marker::Unmanaged;
    };
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return Marker::Broken;
    }

    match rest.split_whitespace().next() {
        Some(BLOCK_ACTIVE) => Marker::Managed(EntryState::Disabled),
        Some(BLOCK_INACTIVE) => Marker::Managed(EntryState::Enabled),
        _ => Marker::Broken,
    }
}
