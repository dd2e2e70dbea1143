use crate::error::Result as CliResult;

use sm_config::Config;
use sm_session::{
    CacheBustPolicy, FileStore, HttpIdentityService, KeyValueStore, SessionHooks,
    SessionOrchestrator, StorageTierAdapter, SystemClock,
};

use std::sync::Arc;

use log::{debug, info};

/// Opens the stored session and rehydrates it.
///
/// `server` overrides the configured API base URL.
pub fn open_session(
    config: &Config,
    server: Option<&str>,
) -> CliResult<SessionHooks<HttpIdentityService>> {
    let durable = FileStore::open(config.durable_store_path()?);
    let session = FileStore::open(config.session_store_path()?);
    debug!(
        "Stores: durable={}, session={}",
        durable.path().display(),
        session.path().display()
    );

    let base_url = server.unwrap_or(&config.api.base_url);
    let service = HttpIdentityService::with_timeout(base_url, config.api.timeout())?;

    let policy = CacheBustPolicy::new(config.cache_bust.query_param.clone(), Arc::new(SystemClock));
    let orchestrator = SessionOrchestrator::new(StorageTierAdapter::new(durable, session), policy);

    let mut hooks = SessionHooks::new(orchestrator, service);
    let report = hooks.on_app_mount();
    if !report.is_fully_persisted() {
        info!("Rehydration left {} write(s) unpersisted", report.failures().len());
    }
    Ok(hooks)
}

/// Ends the browser session: the session store is emptied, the durable
/// store is kept.
pub fn close_browser(config: &Config) -> CliResult<()> {
    let session = FileStore::open(config.session_store_path()?);
    session.clear()?;
    info!("Session store cleared: {}", session.path().display());
    Ok(())
}
