//! Parsed hosts file and the pure enable/disable transitions over it.

use tracing::warn;

use crate::entry::{EntryState, Marker, classify};
use crate::error::HostsError;

/// One line of the hosts file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostLine {
    /// The tagged line, with its text as read.
    Managed { state: EntryState, text: String },
    /// Any other line, passed through verbatim.
    Other(String),
}

impl HostLine {
    pub fn text(&self) -> &str {
        match self {
            Self::Managed { text, .. } | Self::Other(text) => text,
        }
    }

    pub fn state(&self) -> Option<EntryState> {
        match self {
            Self::Managed { state, .. } => Some(*state),
            Self::Other(_) => None,
        }
    }
}

/// Outcome of an enable or disable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The document changed and must be written back.
    Applied {
        from: Option<EntryState>,
        to: EntryState,
    },
    /// Already in the requested state (or nothing to act on); nothing to write.
    Unchanged(Option<EntryState>),
}

/// Hosts file content split on `\n`.
///
/// Rendering joins the lines back with `\n`, so every unmanaged line,
/// including a trailing newline, round-trips byte for byte. In a CRLF file the
/// `\r` stays on each line and rewritten or appended lines carry one too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsDocument {
    lines: Vec<HostLine>,
}

impl HostsDocument {
    pub fn parse(text: &str) -> Result<Self, HostsError> {
        let lines: Vec<HostLine> = text
            .split('\n')
            .enumerate()
            .map(|(index, line)| match classify(line) {
                Marker::Unmanaged => Ok(HostLine::Other(line.to_string())),
                Marker::Managed(state) => Ok(HostLine::Managed {
                    state,
                    text: line.to_string(),
                }),
                Marker::Broken => Err(HostsError::Corrupted {
                    line_number: index + 1,
                    line: line.to_string(),
                }),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { lines })
    }

    /// Effective state of the managed entry, `None` when absent.
    ///
    /// Any active line blocks the domain, so a stray duplicate in the
    /// disabled state wins over an enabled one.
    pub fn state(&self) -> Option<EntryState> {
        let mut managed = self.lines.iter().filter_map(HostLine::state).peekable();
        managed.peek()?;
        if managed.any(|s| s == EntryState::Disabled) {
            Some(EntryState::Disabled)
        } else {
            Some(EntryState::Enabled)
        }
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(HostLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lets `domain` resolve normally by commenting out the block line.
    ///
    /// With no managed line the document is left alone: an absent entry
    /// already means the domain is enabled.
    pub fn enable(&mut self, domain: &str) -> Transition {
        match self.state() {
            None => Transition::Unchanged(None),
            from => self.settle(domain, from, EntryState::Enabled),
        }
    }

    /// Forces `domain` to loopback, appending a managed line if none exists.
    pub fn disable(&mut self, domain: &str) -> Transition {
        match self.state() {
            None => {
                self.append(domain, EntryState::Disabled);
                Transition::Applied {
                    from: None,
                    to: EntryState::Disabled,
                }
            }
            from => self.settle(domain, from, EntryState::Disabled),
        }
    }

    /// Rewrites the first managed line into `to` and drops any later ones.
    fn settle(&mut self, domain: &str, from: Option<EntryState>, to: EntryState) -> Transition {
        let managed = self.lines.iter().filter(|l| l.state().is_some()).count();
        if managed == 1 && from == Some(to) {
            return Transition::Unchanged(from);
        }
        if managed > 1 {
            warn!(count = managed, "Multiple managed hosts lines, keeping the first");
        }

        let mut seen = false;
        self.lines.retain_mut(|line| {
            if line.state().is_none() {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            if line.state() != Some(to) {
                let cr = if line.text().ends_with('\r') { "\r" } else { "" };
                *line = HostLine::Managed {
                    state: to,
                    text: format!("{}{cr}", to.render(domain)),
                };
            }
            true
        });

        Transition::Applied { from, to }
    }

    /// Appends a blank separator and the managed line, keeping a final newline.
    fn append(&mut self, domain: &str, state: EntryState) {
        let cr = if self.is_crlf() { "\r" } else { "" };
        let entry = HostLine::Managed {
            state,
            text: format!("{}{cr}", state.render(domain)),
        };
        let separator = HostLine::Other(cr.to_string());
        let end = HostLine::Other(String::new());

        if self.lines.last() == Some(&end) {
            let at = self.lines.len() - 1;
            self.lines.insert(at, entry);
            self.lines.insert(at, separator);
        } else {
            self.lines.extend([separator, entry, end]);
        }
    }

    /// Whether the first line break in the file is `\r\n`.
    fn is_crlf(&self) -> bool {
        self.lines.len() > 1 && self.lines[0].text().ends_with('\r')
    }
}
