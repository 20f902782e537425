/// What to do with the block given today's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Limit reached: point the domain at loopback.
    Block,
    /// Still under the limit: let the domain resolve.
    Allow,
}

impl Decision {
    pub fn from_count(count: usize, limit: u32) -> Self {
        if count >= limit as usize {
            Self::Block
        } else {
            Self::Allow
        }
    }
}
