use std::fmt;

/// Where a piece of session data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTier {
    /// Survives browser restarts
    Durable,
    /// Survives reloads, cleared when the browser session ends
    Session,
    /// Lives only as long as this page
    Memory,
}

impl StorageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Session => "session",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
