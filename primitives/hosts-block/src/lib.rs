//! Hosts Block - Tagged Loopback Entry For One Domain
//!
//! Owns a single line of the system hosts file, identified by the `smgithub`
//! tag, and moves it between two states:
//!
//! - **enabled**: the domain resolves normally (the mapping is commented out)
//! - **disabled**: the domain is forced to `127.0.0.1`
//!
//! Both directions are idempotent. Every other line of the file is written
//! back unchanged and in order. A tagged line without a recognizable state is
//! reported as corruption and nothing is written.
//!
//! # Usage
//!
//! ```no_run
//! use hosts_block::{DEFAULT_DOMAIN, DEFAULT_HOSTS_PATH, HostsFile};
//!
//! let hosts = HostsFile::new(DEFAULT_HOSTS_PATH, DEFAULT_DOMAIN);
//! let transition = hosts.disable()?;
//! println!("{transition:?}");
//! # Ok::<(), hosts_block::HostsError>(())
//! ```

mod document;
mod entry;
mod error;
mod file;

pub use document::{HostLine, HostsDocument, Transition};
pub use entry::{EntryState, LOOPBACK, Marker, TAG, classify};
pub use error::HostsError;
pub use file::HostsFile;

/// System hosts file.
pub const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// Domain blocked by default.
pub const DEFAULT_DOMAIN: &str = "github.com";
