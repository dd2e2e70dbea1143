pub mod cache_bust_policy;
pub mod clock;

pub use cache_bust_policy::{CacheBustPolicy, DEFAULT_QUERY_PARAM};
pub use clock::{Clock, ManualClock, SystemClock};
