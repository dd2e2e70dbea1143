pub mod dispatch_outcome;
pub mod pending_update;
pub mod session_hooks;
pub mod session_intent;

pub use dispatch_outcome::DispatchOutcome;
pub use pending_update::PendingUpdate;
pub use session_hooks::SessionHooks;
pub use session_intent::SessionIntent;
