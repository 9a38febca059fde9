//! Lazily loaded views.

use crate::error::ViewLoadError;
use crate::view::{ViewFuture, ViewHandle, ViewLoader};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Lazily loaded, memoized view.
///
/// The loader is invoked on the first [`LazyView::get`] call. Concurrent
/// callers wait on the same in-flight load. A successful result is cached
/// for the lifetime of the value; a failed load caches nothing, so the
/// next call invokes the loader again.
pub struct LazyView {
	/// The cached view.
	view: OnceCell<ViewHandle>,
	/// The loader function.
	loader: ViewLoader,
}

impl std::fmt::Debug for LazyView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LazyView")
			.field("loaded", &self.is_loaded())
			.finish()
	}
}

impl LazyView {
	/// Creates a new lazy view.
	///
	/// # Examples
	///
	/// ```
	/// use risk_assessment_router::{LazyView, NamedView};
	///
	/// let lazy = LazyView::new(|| Box::pin(async { Ok(NamedView::new("LoginView").into_handle()) }));
	///
	/// // Nothing is loaded until the view is first requested
	/// assert!(!lazy.is_loaded());
	/// ```
	pub fn new<F>(loader: F) -> Self
	where
		F: Fn() -> ViewFuture + Send + Sync + 'static,
	{
		Self {
			view: OnceCell::new(),
			loader: Arc::new(loader),
		}
	}

	/// Creates a lazy view that is already loaded.
	pub fn preloaded(view: ViewHandle) -> Self {
		Self {
			view: OnceCell::new_with(Some(view.clone())),
			loader: Arc::new(move || -> ViewFuture {
				let view = view.clone();
				Box::pin(async move { Ok(view) })
			}),
		}
	}

	/// Checks if the view is loaded.
	pub fn is_loaded(&self) -> bool {
		self.view.initialized()
	}

	/// Returns the view, loading it if necessary.
	pub async fn get(&self) -> Result<ViewHandle, ViewLoadError> {
		self.view
			.get_or_try_init(|| (self.loader)())
			.await
			.cloned()
	}

	/// Returns the view without loading it.
	pub fn get_if_loaded(&self) -> Option<ViewHandle> {
		self.view.get().cloned()
	}
}
