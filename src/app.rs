//! Process-wide router instance.
//!
//! The router is built once, on first use, from [`RouterSettings::from_env`]
//! and lives for the rest of the process. Tests and embedders that need
//! independent instances use [`build_router`].

use crate::routes::route_table;
use once_cell::sync::OnceCell;
use risk_assessment_router::{Router, RouterError, RouterSettings};

static ROUTER: OnceCell<Router> = OnceCell::new();

/// Builds a router over the application's route table.
///
/// In the browser, history is backed by `window.history` under the
/// configured base path; elsewhere it is kept in memory.
pub fn build_router(settings: &RouterSettings) -> Result<Router, RouterError> {
	let base = settings.base();
	let router = Router::new(history(&base)?, route_table()?);
	tracing::debug!(base = %base, routes = router.routes().len(), "built router");
	Ok(router)
}

#[cfg(target_arch = "wasm32")]
fn history(base: &str) -> Result<risk_assessment_router::BrowserHistory, RouterError> {
	risk_assessment_router::BrowserHistory::new(base)
}

#[cfg(not(target_arch = "wasm32"))]
fn history(base: &str) -> Result<risk_assessment_router::MemoryHistory, RouterError> {
	Ok(risk_assessment_router::MemoryHistory::new(base))
}

/// Returns the process-wide router, initializing it from the environment
/// on first use.
pub fn router() -> Result<&'static Router, RouterError> {
	ROUTER.get_or_try_init(|| build_router(&RouterSettings::from_env()))
}

/// Starts the application's router: follows browser history changes and
/// mounts the view for the current location.
///
/// Calling it again only re-mounts the current location.
pub async fn start() -> Result<&'static Router, RouterError> {
	let router = router()?;
	router.setup_history_listener();
	router.sync_with_location().await?;
	Ok(router)
}
