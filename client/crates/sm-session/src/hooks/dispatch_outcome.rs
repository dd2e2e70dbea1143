use crate::{PersistReport, SessionError};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Applied in memory; `report` lists writes that did not persist
    Applied { report: PersistReport },
    /// Nothing changed; `message` is shown to the user
    Rejected { message: String },
}

impl DispatchOutcome {
    pub fn rejected(err: &SessionError) -> Self {
        Self::Rejected {
            message: err.user_message(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Applied { .. } => None,
            Self::Rejected { message } => Some(message),
        }
    }
}
