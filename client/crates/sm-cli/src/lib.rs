pub mod error;
pub mod logger;
pub mod report;
pub mod session;

#[cfg(test)]
mod tests;

pub use error::{CliError, Result as CliResult};
pub use report::SessionReport;
pub use session::{close_browser, open_session};
