//! Router Implementation.
//!
//! This module provides the main Router struct and navigation logic.
//!
//! A navigation resolves its target, loads the route's view (the only
//! suspension point), then mounts the view and records the location in the
//! history stack. A failed load leaves both the mounted view and the history
//! untouched. When navigations overlap, the most recently started one wins:
//! older ones finish with [`RouterError::NavigationSuperseded`] without
//! mounting anything.

use crate::error::RouterError;
use crate::history::{History, HistoryState, MemoryHistory, NavigationType};
use crate::loader::LazyView;
use crate::route::{MatchOptions, RouteDefinition, RouteTable, split_location};
use crate::view::{ViewFuture, ViewHandle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Type alias for after-navigation listeners.
pub(crate) type NavigationListener = Arc<dyn Fn(&NavigationOutcome) + Send + Sync>;

/// Route name reported for the not-found view.
pub const NOT_FOUND_ROUTE: &str = "not_found";

/// Target of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
	/// An app-relative location, e.g. `/assets.html?scope=2`.
	Path(String),
	/// A route name, e.g. `assets`.
	Name(String),
}

impl NavigationTarget {
	/// Creates a path target.
	pub fn path(path: impl Into<String>) -> Self {
		Self::Path(path.into())
	}

	/// Creates a route name target.
	pub fn name(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}
}

/// A leading `/` selects a path, anything else a route name.
impl From<&str> for NavigationTarget {
	fn from(target: &str) -> Self {
		if target.starts_with('/') {
			Self::path(target)
		} else {
			Self::name(target)
		}
	}
}

impl From<String> for NavigationTarget {
	fn from(target: String) -> Self {
		if target.starts_with('/') {
			Self::Path(target)
		} else {
			Self::Name(target)
		}
	}
}

impl fmt::Display for NavigationTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Path(path) => write!(f, "{}", path),
			Self::Name(name) => write!(f, "route '{}'", name),
		}
	}
}

/// The currently mounted route.
#[derive(Debug, Clone)]
pub struct CurrentRoute {
	/// App-relative location, including query string and hash.
	pub location: String,
	/// Route name, `None` when the not-found view is mounted.
	pub name: Option<String>,
	/// The mounted view.
	pub view: ViewHandle,
}

/// Result of a committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
	/// App-relative location now current.
	pub location: String,
	/// Route name, `None` when the not-found view was mounted.
	pub route_name: Option<String>,
	/// How the history stack changed.
	pub kind: NavigationType,
}

/// A resolved navigation target.
struct Resolved<'a> {
	/// Location to record in history.
	location: String,
	/// Matched route, `None` for the not-found view.
	route: Option<&'a RouteDefinition>,
}

impl Resolved<'_> {
	fn route_name(&self) -> Option<&str> {
		self.route.map(RouteDefinition::name)
	}
}

/// The client-side router.
///
/// Holds the route table, the history stack and the mounted view. The table
/// never changes after construction.
pub struct Router {
	/// Route definitions.
	table: RouteTable,
	/// History stack.
	history: Mutex<Box<dyn History>>,
	/// Currently mounted route.
	current: Mutex<Option<CurrentRoute>>,
	/// View mounted for unmatched paths.
	not_found: Option<LazyView>,
	/// Sequence number of the most recently started navigation.
	sequence: AtomicU64,
	/// After-navigation listeners.
	listeners: Mutex<Vec<NavigationListener>>,
	/// Whether the popstate listener is registered.
	listening: AtomicBool,
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("routes_count", &self.table.len())
			.field("location", &self.location())
			.field("has_not_found", &self.not_found.is_some())
			.finish()
	}
}

impl Router {
	/// Creates a router over a history backend and a route table.
	pub fn new<H>(history: H, table: RouteTable) -> Self
	where
		H: History + 'static,
	{
		Self {
			table,
			history: Mutex::new(Box::new(history)),
			current: Mutex::new(None),
			not_found: None,
			sequence: AtomicU64::new(0),
			listeners: Mutex::new(Vec::new()),
			listening: AtomicBool::new(false),
		}
	}

	/// Starts building a router.
	pub fn builder() -> RouterBuilder {
		RouterBuilder::default()
	}

	/// Returns the route table.
	pub fn routes(&self) -> &RouteTable {
		&self.table
	}

	/// Matches a path against the route table.
	pub fn resolve(&self, path: &str) -> Option<&RouteDefinition> {
		let route = self.table.resolve(path);
		tracing::debug!(path, route = route.map(RouteDefinition::name), "resolved path");
		route
	}

	/// Returns the path of the route registered under `name`.
	pub fn reverse(&self, name: &str) -> Result<String, RouterError> {
		self.table
			.by_name(name)
			.map(|route| route.path().to_string())
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))
	}

	/// Returns the base-prefixed URL for a target.
	pub fn href(&self, target: impl Into<NavigationTarget>) -> Result<String, RouterError> {
		let resolved = self.resolve_target(&target.into())?;
		Ok(self.history.lock().href(&resolved.location))
	}

	/// Navigates to a target, pushing a history entry.
	///
	/// Navigating to the current location replaces the current entry
	/// instead of adding a duplicate.
	pub async fn push(
		&self,
		target: impl Into<NavigationTarget>,
	) -> Result<NavigationOutcome, RouterError> {
		self.navigate(target.into(), NavigationType::Push).await
	}

	/// Navigates to a target, replacing the current history entry.
	pub async fn replace(
		&self,
		target: impl Into<NavigationTarget>,
	) -> Result<NavigationOutcome, RouterError> {
		self.navigate(target.into(), NavigationType::Replace).await
	}

	/// Goes one entry back in history.
	pub async fn back(&self) -> Result<NavigationOutcome, RouterError> {
		self.go(-1).await
	}

	/// Goes one entry forward in history.
	pub async fn forward(&self) -> Result<NavigationOutcome, RouterError> {
		self.go(1).await
	}

	/// Moves `delta` entries through history.
	///
	/// The history cursor only moves once the target entry's view is
	/// loaded.
	pub async fn go(&self, delta: isize) -> Result<NavigationOutcome, RouterError> {
		let entry = self.peek(delta)?;
		self.traverse(entry, move |history| history.go(delta)).await
	}

	/// Mounts the view for the current history location without adding an
	/// entry. Used at startup.
	pub async fn sync_with_location(&self) -> Result<NavigationOutcome, RouterError> {
		let location = self.location();
		self.navigate(NavigationTarget::Path(location), NavigationType::Replace)
			.await
	}

	/// Follows a history move the environment already performed, such as
	/// the user pressing the browser's back button.
	///
	/// `state` is the entry the environment moved to. Its location is
	/// mounted even when the entry predates this router, e.g. after a page
	/// reload. Returns `Ok(None)` for moves the router started itself.
	pub async fn sync_history_state(
		&self,
		state: HistoryState,
	) -> Result<Option<NavigationOutcome>, RouterError> {
		if self.history.lock().consume_pending_pop() {
			return Ok(None);
		}

		let entry = state.clone();
		self.traverse(entry, move |history| {
			history.restore(&state);
			Ok(())
		})
		.await
		.map(Some)
	}

	/// Registers a listener called after every committed navigation.
	pub fn subscribe<F>(&self, listener: F)
	where
		F: Fn(&NavigationOutcome) + Send + Sync + 'static,
	{
		self.listeners.lock().push(Arc::new(listener));
	}

	/// Returns the currently mounted route.
	pub fn current_route(&self) -> Option<CurrentRoute> {
		self.current.lock().clone()
	}

	/// Returns the currently mounted view.
	pub fn mounted_view(&self) -> Option<ViewHandle> {
		self.current
			.lock()
			.as_ref()
			.map(|current| current.view.clone())
	}

	/// Returns the current history location.
	pub fn location(&self) -> String {
		self.history.lock().location().to_string()
	}

	/// Returns the number of history entries.
	pub fn history_len(&self) -> usize {
		self.history.lock().len()
	}

	/// Returns all history entries, oldest first.
	pub fn history_entries(&self) -> Vec<HistoryState> {
		let history = self.history.lock();
		let start = -(history.position() as isize);
		(start..)
			.map_while(|delta| history.peek(delta).cloned())
			.collect()
	}

	async fn navigate(
		&self,
		target: NavigationTarget,
		requested: NavigationType,
	) -> Result<NavigationOutcome, RouterError> {
		let resolved = self.resolve_target(&target)?;
		let ticket = self.begin();
		let view = self.load(&resolved).await?;

		let outcome = {
			let mut history = self.history.lock();
			self.ensure_latest(ticket, &resolved.location)?;

			let kind = if requested == NavigationType::Push
				&& history.location() == resolved.location
			{
				NavigationType::Replace
			} else {
				requested
			};
			match kind {
				NavigationType::Push => history.push(&resolved.location, resolved.route_name())?,
				_ => history.replace(&resolved.location, resolved.route_name())?,
			}
			self.mount(&resolved, view, kind)
		};

		self.notify(&outcome);
		Ok(outcome)
	}

	async fn traverse<F>(
		&self,
		entry: HistoryState,
		commit: F,
	) -> Result<NavigationOutcome, RouterError>
	where
		F: FnOnce(&mut Box<dyn History>) -> Result<(), RouterError>,
	{
		let resolved = self.resolve_location(&entry.path)?;
		let resolved = Resolved {
			location: entry.path,
			route: resolved.route,
		};
		let ticket = self.begin();
		let view = self.load(&resolved).await?;

		let outcome = {
			let mut history = self.history.lock();
			self.ensure_latest(ticket, &resolved.location)?;
			commit(&mut history)?;
			self.mount(&resolved, view, NavigationType::Pop)
		};

		self.notify(&outcome);
		Ok(outcome)
	}

	fn peek(&self, delta: isize) -> Result<HistoryState, RouterError> {
		self.history
			.lock()
			.peek(delta)
			.cloned()
			.ok_or(RouterError::HistoryBoundary(delta))
	}

	fn resolve_target(&self, target: &NavigationTarget) -> Result<Resolved<'_>, RouterError> {
		match target {
			NavigationTarget::Name(name) => {
				let route = self
					.table
					.by_name(name)
					.ok_or_else(|| RouterError::InvalidRouteName(name.clone()))?;
				Ok(Resolved {
					location: route.path().to_string(),
					route: Some(route),
				})
			}
			NavigationTarget::Path(path) => self.resolve_location(path),
		}
	}

	/// Resolves a location. A matched location is recorded with the route's
	/// canonical path followed by the original query string and hash.
	fn resolve_location(&self, location: &str) -> Result<Resolved<'_>, RouterError> {
		let (_, suffix) = split_location(location);

		match self.resolve(location) {
			Some(route) => Ok(Resolved {
				location: format!("{}{}", route.path(), suffix),
				route: Some(route),
			}),
			None if self.not_found.is_some() => Ok(Resolved {
				location: location.to_string(),
				route: None,
			}),
			None => {
				tracing::warn!(location, "no route matches location");
				Err(RouterError::NotFound(location.to_string()))
			}
		}
	}

	async fn load(&self, resolved: &Resolved<'_>) -> Result<ViewHandle, RouterError> {
		let (name, view) = match (resolved.route, &self.not_found) {
			(Some(route), _) => (route.name(), route.view()),
			(None, Some(not_found)) => (NOT_FOUND_ROUTE, not_found),
			(None, None) => return Err(RouterError::NotFound(resolved.location.clone())),
		};

		view.get().await.map_err(|source| {
			tracing::warn!(route = name, error = %source, "failed to load view");
			RouterError::ViewLoad {
				route: name.to_string(),
				source,
			}
		})
	}

	fn begin(&self) -> u64 {
		self.sequence.fetch_add(1, Ordering::SeqCst) + 1
	}

	fn ensure_latest(&self, ticket: u64, location: &str) -> Result<(), RouterError> {
		if self.sequence.load(Ordering::SeqCst) == ticket {
			Ok(())
		} else {
			tracing::debug!(location, "navigation superseded");
			Err(RouterError::NavigationSuperseded(location.to_string()))
		}
	}

	/// Swaps the mounted view. Called with the history lock held so the
	/// mounted route always matches the current history entry.
	fn mount(
		&self,
		resolved: &Resolved<'_>,
		view: ViewHandle,
		kind: NavigationType,
	) -> NavigationOutcome {
		let outcome = NavigationOutcome {
			location: resolved.location.clone(),
			route_name: resolved.route_name().map(str::to_string),
			kind,
		};

		tracing::info!(
			location = %outcome.location,
			route = outcome.route_name.as_deref(),
			view = view.name(),
			kind = ?kind,
			"mounted view"
		);

		*self.current.lock() = Some(CurrentRoute {
			location: outcome.location.clone(),
			name: outcome.route_name.clone(),
			view,
		});

		outcome
	}

	fn notify(&self, outcome: &NavigationOutcome) {
		let listeners = self.listeners.lock().clone();
		for listener in listeners {
			listener(outcome);
		}
	}
}

#[cfg(target_arch = "wasm32")]
impl Router {
	/// Follows browser back/forward buttons by listening for `popstate`.
	///
	/// The listener is kept alive for the lifetime of the page. Returns
	/// `false` if it was already registered or could not be.
	pub fn setup_history_listener(&'static self) -> bool {
		use wasm_bindgen::JsCast;
		use wasm_bindgen::closure::Closure;

		if self.listening.swap(true, Ordering::SeqCst) {
			return false;
		}
		let Some(window) = web_sys::window() else {
			self.listening.store(false, Ordering::SeqCst);
			return false;
		};

		let closure = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(
			move |event: web_sys::PopStateEvent| {
				let Some(state) = event
					.state()
					.as_string()
					.and_then(|json| HistoryState::from_json(&json))
				else {
					tracing::debug!("ignoring popstate without router state");
					return;
				};

				wasm_bindgen_futures::spawn_local(async move {
					if let Err(err) = self.sync_history_state(state).await {
						tracing::warn!(error = %err, "failed to follow history change");
					}
				});
			},
		);

		if window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.is_err()
		{
			self.listening.store(false, Ordering::SeqCst);
			return false;
		}
		closure.forget();
		true
	}
}

#[cfg(not(target_arch = "wasm32"))]
impl Router {
	/// Nothing to listen to on non-WASM targets. Returns `false` on every
	/// call after the first, like the browser version.
	pub fn setup_history_listener(&'static self) -> bool {
		!self.listening.swap(true, Ordering::SeqCst)
	}
}

/// Builder for [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
	/// Routes in declaration order.
	routes: Vec<RouteDefinition>,
	/// Path comparison options.
	options: MatchOptions,
	/// View mounted for unmatched paths.
	not_found: Option<LazyView>,
	/// History backend, in-memory when unset.
	history: Option<Box<dyn History>>,
}

impl fmt::Debug for RouterBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("routes", &self.routes)
			.field("options", &self.options)
			.field("has_not_found", &self.not_found.is_some())
			.finish()
	}
}

impl RouterBuilder {
	/// Adds a named route.
	pub fn named_route<F>(mut self, name: &str, path: &str, loader: F) -> Self
	where
		F: Fn() -> ViewFuture + Send + Sync + 'static,
	{
		self.routes.push(RouteDefinition::new(path, name, loader));
		self
	}

	/// Adds a route definition.
	pub fn route(mut self, route: RouteDefinition) -> Self {
		self.routes.push(route);
		self
	}

	/// Sets the path comparison options.
	pub fn match_options(mut self, options: MatchOptions) -> Self {
		self.options = options;
		self
	}

	/// Sets the view mounted for paths no route matches.
	pub fn not_found<F>(mut self, loader: F) -> Self
	where
		F: Fn() -> ViewFuture + Send + Sync + 'static,
	{
		self.not_found = Some(LazyView::new(loader));
		self
	}

	/// Sets the history backend.
	pub fn history<H>(mut self, history: H) -> Self
	where
		H: History + 'static,
	{
		self.history = Some(Box::new(history));
		self
	}

	/// Builds the router.
	///
	/// # Errors
	///
	/// Fails if the route table is invalid (see [`RouteTable::with_options`]).
	pub fn build(self) -> Result<Router, RouterError> {
		let table = RouteTable::with_options(self.routes, self.options)?;
		let history = self
			.history
			.unwrap_or_else(|| Box::new(MemoryHistory::default()));

		Ok(Router {
			table,
			history: Mutex::new(history),
			current: Mutex::new(None),
			not_found: self.not_found,
			sequence: AtomicU64::new(0),
			listeners: Mutex::new(Vec::new()),
			listening: AtomicBool::new(false),
		})
	}
}
