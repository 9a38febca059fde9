//! Opaque view components.
//!
//! The router never looks inside a view. It only needs to hold on to a
//! handle, mount it, and report which component is mounted.

use crate::error::ViewLoadError;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// A mountable view component.
pub trait View: Send + Sync + 'static {
	/// Component name, e.g. `"LoginView"`.
	fn name(&self) -> &str;
}

impl fmt::Debug for dyn View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View").field("name", &self.name()).finish()
	}
}

/// Shared handle to a loaded view.
pub type ViewHandle = Arc<dyn View>;

/// Future returned by a view loader.
pub type ViewFuture = BoxFuture<'static, Result<ViewHandle, ViewLoadError>>;

/// Zero-argument asynchronous view factory.
pub type ViewLoader = Arc<dyn Fn() -> ViewFuture + Send + Sync>;

/// A view identified only by its component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedView {
	name: String,
}

impl NamedView {
	/// Creates a view with the given component name.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}

	/// Wraps the view in a [`ViewHandle`].
	pub fn into_handle(self) -> ViewHandle {
		Arc::new(self)
	}
}

impl View for NamedView {
	fn name(&self) -> &str {
		&self.name
	}
}
