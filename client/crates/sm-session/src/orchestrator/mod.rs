pub mod orchestrator;
pub mod persist_report;
pub mod session_state;
pub mod update_ticket;

pub use orchestrator::SessionOrchestrator;
pub use persist_report::{FailedWrite, PersistReport};
pub use session_state::{SessionState, SyncState};
pub use update_ticket::UpdateTicket;
