//! Error types for client-side routing.

use thiserror::Error;

/// Error produced by a view loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewLoadError {
	/// The view module could not be fetched.
	#[error("failed to fetch view module: {0}")]
	Fetch(String),
	/// The view module was fetched but could not be evaluated.
	#[error("malformed view module: {0}")]
	Malformed(String),
}

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// No route matches the requested path.
	#[error("Route not found: {0}")]
	NotFound(String),
	/// No route is registered under the requested name.
	#[error("Invalid route name: {0}")]
	InvalidRouteName(String),
	/// A route path is not an absolute literal path.
	#[error("Invalid route path: {0}")]
	InvalidPath(String),
	/// Two route definitions claim the same path.
	#[error("Duplicate route path: {0}")]
	DuplicatePath(String),
	/// Two route definitions claim the same name.
	#[error("Duplicate route name: {0}")]
	DuplicateName(String),
	/// The route's view failed to load; nothing was mounted.
	#[error("Failed to load view for route '{route}': {source}")]
	ViewLoad {
		/// Name of the route whose view failed to load.
		route: String,
		/// Loader error.
		#[source]
		source: ViewLoadError,
	},
	/// A newer navigation started while this one was loading its view.
	#[error("Navigation to {0} was superseded by a newer navigation")]
	NavigationSuperseded(String),
	/// The history stack has no entry at the requested offset.
	#[error("No history entry at offset {0}")]
	HistoryBoundary(isize),
	/// The history backend rejected the update.
	#[error("Navigation failed: {0}")]
	NavigationFailed(String),
}

impl RouterError {
	/// Returns `true` if the error left the router state untouched because
	/// the target could not be resolved.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_) | Self::InvalidRouteName(_))
	}
}
