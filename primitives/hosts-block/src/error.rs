use std::path::PathBuf;
use thiserror::Error;

/// Hosts file errors. A corrupted entry aborts before anything is written.
#[derive(Error, Debug)]
pub enum HostsError {
    #[error("failed to read hosts file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write hosts file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("broken 'smgithub' field on line {line_number} of the hosts file: {line:?}")]
    Corrupted { line_number: usize, line: String },
}
