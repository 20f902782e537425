//! Reading and replacing the hosts file on disk.

use std::{
    fs::{self, OpenOptions, Permissions},
    io::{self, ErrorKind, Write},
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::document::{HostsDocument, Transition};
use crate::entry::{EntryState, TAG};
use crate::error::HostsError;

/// Mode for a hosts file that did not exist before.
const DEFAULT_MODE: u32 = 0o644;

/// The hosts file and the domain whose managed entry it carries.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never sees a half-written file. The caller is expected to hold the
/// privilege needed to replace `path`.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
    domain: String,
}

impl HostsFile {
    pub fn new(path: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            domain: domain.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn read(&self) -> Result<HostsDocument, HostsError> {
        let text = fs::read_to_string(&self.path).map_err(|source| HostsError::Read {
            path: self.path.clone(),
            source,
        })?;
        HostsDocument::parse(&text)
    }

    /// Current state of the managed entry without modifying anything.
    pub fn state(&self) -> Result<Option<EntryState>, HostsError> {
        Ok(self.read()?.state())
    }

    /// Lets the domain resolve normally.
    pub fn enable(&self) -> Result<Transition, HostsError> {
        self.apply(HostsDocument::enable)
    }

    /// Points the domain at loopback.
    pub fn disable(&self) -> Result<Transition, HostsError> {
        self.apply(HostsDocument::disable)
    }

    fn apply(
        &self,
        transition: impl FnOnce(&mut HostsDocument, &str) -> Transition,
    ) -> Result<Transition, HostsError> {
        let mut document = self.read()?;
        let outcome = transition(&mut document, &self.domain);

        match outcome {
            Transition::Unchanged(state) => {
                debug!(path = %self.path.display(), ?state, "Hosts entry already in place");
            }
            Transition::Applied { from, to } => {
                replace_file(&self.path, &document.render()).map_err(|source| {
                    HostsError::Write {
                        path: self.path.clone(),
                        source,
                    }
                })?;
                info!(
                    path = %self.path.display(),
                    domain = %self.domain,
                    ?from,
                    %to,
                    "Rewrote hosts entry"
                );
            }
        }

        Ok(outcome)
    }
}

/// Replaces `path` with `content` via temp file and rename.
///
/// A symlinked `path` is resolved first so the link survives and its target
/// receives the content. The mode is taken from the existing file with group
/// and other write bits cleared. Falls back to an in-place write when the file
/// cannot be renamed over, as with a bind-mounted `/etc/hosts` inside a
/// container.
fn replace_file(path: &Path, content: &str) -> io::Result<()> {
    let resolved = match fs::canonicalize(path) {
        Ok(target) => target,
        Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };
    let path = resolved.as_path();

    let mode = match fs::metadata(path) {
        Ok(meta) => meta.permissions().mode() & 0o7777 & !0o022,
        Err(e) if e.kind() == ErrorKind::NotFound => DEFAULT_MODE,
        Err(e) => return Err(e),
    };

    let temp = temp_path(path);
    let _ = fs::remove_file(&temp);

    if let Err(e) = write_synced(&temp, content, mode) {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }

    match fs::rename(&temp, path) {
        Ok(()) => Ok(()),
        Err(e) if matches!(e.kind(), ErrorKind::ResourceBusy | ErrorKind::CrossesDevices) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Cannot rename over hosts file, writing in place"
            );
            let _ = fs::remove_file(&temp);
            fs::write(path, content)?;
            fs::set_permissions(path, Permissions::from_mode(mode))
        }
        Err(e) => {
            let _ = fs::remove_file(&temp);
            Err(e)
        }
    }
}

fn write_synced(path: &Path, content: &str, mode: u32) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    // The umask may have narrowed the mode passed to open.
    file.set_permissions(Permissions::from_mode(mode))?;
    file.sync_all()
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "hosts".to_string());
    path.with_file_name(format!(".{name}.{TAG}.tmp"))
}
