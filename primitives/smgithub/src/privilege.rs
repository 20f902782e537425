use nix::unistd::geteuid;

/// Whether the process may rewrite the hosts file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Root,
    User,
}

impl Privilege {
    /// Privilege of the running process, from its effective uid.
    pub fn current() -> Self {
        if geteuid().is_root() {
            Self::Root
        } else {
            Self::User
        }
    }

    pub fn is_elevated(self) -> bool {
        self == Self::Root
    }
}
