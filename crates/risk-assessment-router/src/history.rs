//! History stack management.
//!
//! [`History`] abstracts the stack of visited locations. [`MemoryHistory`]
//! keeps the stack in memory and backs every non-browser target;
//! `BrowserHistory` (wasm32 only) mirrors the same stack into
//! `window.history` under a base path.

use crate::error::RouterError;
use serde::{Deserialize, Serialize};

/// State stored with each history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
	/// App-relative location, including query string and hash.
	pub path: String,
	/// Name of the route that rendered this entry, if any.
	pub route_name: Option<String>,
	/// Index of the entry in the stack.
	pub position: usize,
}

impl HistoryState {
	/// Creates a new history state.
	pub fn new(path: impl Into<String>, position: usize) -> Self {
		Self {
			path: path.into(),
			route_name: None,
			position,
		}
	}

	/// Sets the route name.
	pub fn with_route_name(mut self, name: Option<&str>) -> Self {
		self.route_name = name.map(str::to_string);
		self
	}

	/// Serializes the state for the browser's `history.state` slot.
	pub fn to_json(&self) -> Result<String, RouterError> {
		serde_json::to_string(self).map_err(|e| RouterError::NavigationFailed(e.to_string()))
	}

	/// Deserializes a state previously written by [`HistoryState::to_json`].
	pub fn from_json(json: &str) -> Option<Self> {
		serde_json::from_str(json).ok()
	}
}

/// How a navigation changed the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationType {
	/// A new entry was pushed.
	Push,
	/// The current entry was replaced.
	Replace,
	/// The cursor moved to an existing entry (back/forward).
	Pop,
}

/// A stack of visited locations.
pub trait History: Send {
	/// Normalized base path (`""` for root).
	fn base(&self) -> &str;

	/// Current entry.
	fn current(&self) -> &HistoryState;

	/// Entry `delta` positions away from the current one.
	fn peek(&self, delta: isize) -> Option<&HistoryState>;

	/// Pushes a new entry, discarding any forward entries.
	fn push(&mut self, path: &str, route_name: Option<&str>) -> Result<(), RouterError>;

	/// Replaces the current entry.
	fn replace(&mut self, path: &str, route_name: Option<&str>) -> Result<(), RouterError>;

	/// Moves the cursor by `delta` entries.
	///
	/// # Errors
	///
	/// Returns [`RouterError::HistoryBoundary`] if no entry exists there.
	fn go(&mut self, delta: isize) -> Result<(), RouterError>;

	/// Moves the cursor to the entry described by `state` after the
	/// environment already moved there (e.g. the user pressed the browser's
	/// back button).
	///
	/// An entry this stack does not know, such as one recorded before a page
	/// reload, replaces the whole stack.
	fn restore(&mut self, state: &HistoryState);

	/// Returns `true` once for every move started by [`History::go`] that the
	/// environment reports back asynchronously.
	fn consume_pending_pop(&mut self) -> bool {
		false
	}

	/// Number of entries.
	fn len(&self) -> usize;

	/// Index of the current entry.
	fn position(&self) -> usize;

	/// Current app-relative location.
	fn location(&self) -> &str {
		&self.current().path
	}

	/// Full URL for an app-relative path.
	fn href(&self, path: &str) -> String {
		join_base(self.base(), path)
	}
}

/// Normalizes a base path: leading slash, no trailing slash, `""` for root.
pub fn normalize_base(base: &str) -> String {
	let trimmed = base.trim().trim_end_matches('/');
	if trimmed.is_empty() {
		String::new()
	} else if trimmed.starts_with('/') {
		trimmed.to_string()
	} else {
		format!("/{}", trimmed)
	}
}

/// Prefixes an app-relative path with a normalized base.
pub fn join_base(base: &str, path: &str) -> String {
	if path.starts_with('/') {
		format!("{}{}", base, path)
	} else {
		format!("{}/{}", base, path)
	}
}

/// Strips a normalized base from a full location.
///
/// Locations outside the base are returned unchanged.
pub fn strip_base<'a>(base: &str, location: &'a str) -> &'a str {
	match location.strip_prefix(base) {
		Some("") => "/",
		Some(rest) if rest.starts_with(['/', '?', '#']) => rest,
		_ => location,
	}
}

/// In-memory history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
	/// Normalized base path.
	base: String,
	/// Entries, oldest first.
	entries: Vec<HistoryState>,
	/// Index of the current entry.
	position: usize,
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("")
	}
}

impl MemoryHistory {
	/// Creates a history whose single entry is `/`.
	pub fn new(base: &str) -> Self {
		Self::with_location(base, "/")
	}

	/// Creates a history whose single entry is `location`.
	pub fn with_location(base: &str, location: &str) -> Self {
		let location = if location.is_empty() { "/" } else { location };
		Self {
			base: normalize_base(base),
			entries: vec![HistoryState::new(location, 0)],
			position: 0,
		}
	}

	/// Returns all entries, oldest first.
	pub fn entries(&self) -> &[HistoryState] {
		&self.entries
	}

	fn offset(&self, delta: isize) -> Option<usize> {
		self.position
			.checked_add_signed(delta)
			.filter(|&index| index < self.entries.len())
	}
}

impl History for MemoryHistory {
	fn base(&self) -> &str {
		&self.base
	}

	fn current(&self) -> &HistoryState {
		&self.entries[self.position]
	}

	fn peek(&self, delta: isize) -> Option<&HistoryState> {
		self.offset(delta).map(|index| &self.entries[index])
	}

	fn push(&mut self, path: &str, route_name: Option<&str>) -> Result<(), RouterError> {
		self.entries.truncate(self.position + 1);
		self.position = self.entries.len();
		self.entries
			.push(HistoryState::new(path, self.position).with_route_name(route_name));
		Ok(())
	}

	fn replace(&mut self, path: &str, route_name: Option<&str>) -> Result<(), RouterError> {
		self.entries[self.position] =
			HistoryState::new(path, self.position).with_route_name(route_name);
		Ok(())
	}

	fn go(&mut self, delta: isize) -> Result<(), RouterError> {
		self.position = self
			.offset(delta)
			.ok_or(RouterError::HistoryBoundary(delta))?;
		Ok(())
	}

	fn restore(&mut self, state: &HistoryState) {
		match self.entries.get(state.position) {
			Some(entry) if entry.path == state.path => self.position = state.position,
			_ => {
				tracing::debug!(
					path = %state.path,
					position = state.position,
					"reseeding history from unknown entry"
				);
				self.entries = vec![HistoryState {
					position: 0,
					..state.clone()
				}];
				self.position = 0;
			}
		}
	}

	fn len(&self) -> usize {
		self.entries.len()
	}

	fn position(&self) -> usize {
		self.position
	}
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
	use super::{History, HistoryState, MemoryHistory, normalize_base, strip_base};
	use crate::error::RouterError;
	use wasm_bindgen::JsValue;

	fn window_history() -> Result<web_sys::History, RouterError> {
		web_sys::window()
			.ok_or_else(|| RouterError::NavigationFailed("no window".to_string()))?
			.history()
			.map_err(|e| RouterError::NavigationFailed(format!("{:?}", e)))
	}

	/// Reads the browser's current location relative to `base`.
	fn browser_location(base: &str) -> String {
		let Some(window) = web_sys::window() else {
			return "/".to_string();
		};
		let location = window.location();
		let full = format!(
			"{}{}{}",
			location.pathname().unwrap_or_default(),
			location.search().unwrap_or_default(),
			location.hash().unwrap_or_default()
		);
		strip_base(base, &full).to_string()
	}

	/// History backed by the browser's `window.history`.
	///
	/// The stack is mirrored in memory so the router can look at entries
	/// before the browser moves to them. Each entry's [`HistoryState`] is
	/// stored as JSON in `history.state`. The mirror only changes once the
	/// browser accepted the update.
	#[derive(Debug)]
	pub struct BrowserHistory {
		/// Mirror of the browser stack since page load, or since the last
		/// move to an entry recorded before it.
		mirror: MemoryHistory,
		/// Moves started by `go` whose popstate event has not arrived yet.
		pending_pops: usize,
	}

	impl BrowserHistory {
		/// Creates a history scoped under `base`, seeded with the current
		/// browser location.
		pub fn new(base: &str) -> Result<Self, RouterError> {
			let base = normalize_base(base);
			let location = browser_location(&base);
			let mirror = MemoryHistory::with_location(&base, &location);
			write(&mirror, web_sys::History::replace_state_with_url)?;
			Ok(Self {
				mirror,
				pending_pops: 0,
			})
		}
	}

	/// Writes the current entry of `stack` to the browser.
	fn write(
		stack: &MemoryHistory,
		op: fn(&web_sys::History, &JsValue, &str, Option<&str>) -> Result<(), JsValue>,
	) -> Result<(), RouterError> {
		let state = stack.current();
		let json = state.to_json()?;
		let url = stack.href(&state.path);
		op(&window_history()?, &JsValue::from_str(&json), "", Some(&url))
			.map_err(|e| RouterError::NavigationFailed(format!("{:?}", e)))
	}

	impl History for BrowserHistory {
		fn base(&self) -> &str {
			self.mirror.base()
		}

		fn current(&self) -> &HistoryState {
			self.mirror.current()
		}

		fn peek(&self, delta: isize) -> Option<&HistoryState> {
			self.mirror.peek(delta)
		}

		fn push(&mut self, path: &str, route_name: Option<&str>) -> Result<(), RouterError> {
			let mut next = self.mirror.clone();
			next.push(path, route_name)?;
			write(&next, web_sys::History::push_state_with_url)?;
			self.mirror = next;
			Ok(())
		}

		fn replace(&mut self, path: &str, route_name: Option<&str>) -> Result<(), RouterError> {
			let mut next = self.mirror.clone();
			next.replace(path, route_name)?;
			write(&next, web_sys::History::replace_state_with_url)?;
			self.mirror = next;
			Ok(())
		}

		fn go(&mut self, delta: isize) -> Result<(), RouterError> {
			if self.mirror.peek(delta).is_none() {
				return Err(RouterError::HistoryBoundary(delta));
			}
			let browser_delta =
				i32::try_from(delta).map_err(|_| RouterError::HistoryBoundary(delta))?;
			window_history()?
				.go_with_delta(browser_delta)
				.map_err(|e| RouterError::NavigationFailed(format!("{:?}", e)))?;
			self.mirror.go(delta)?;
			self.pending_pops += 1;
			Ok(())
		}

		fn restore(&mut self, state: &HistoryState) {
			self.mirror.restore(state);
		}

		fn consume_pending_pop(&mut self) -> bool {
			if self.pending_pops > 0 {
				self.pending_pops -= 1;
				true
			} else {
				false
			}
		}

		fn len(&self) -> usize {
			self.mirror.len()
		}

		fn position(&self) -> usize {
			self.mirror.position()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "")]
	#[case("/", "")]
	#[case("  /  ", "")]
	#[case("/app/", "/app")]
	#[case("app", "/app")]
	#[case("/risk/assessment//", "/risk/assessment")]
	fn test_normalize_base(#[case] base: &str, #[case] expected: &str) {
		assert_eq!(normalize_base(base), expected);
	}

	#[rstest]
	#[case("", "/assets.html", "/assets.html")]
	#[case("/app", "/assets.html", "/app/assets.html")]
	#[case("/app", "/", "/app/")]
	#[case("/app", "users.html", "/app/users.html")]
	fn test_join_base(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
		assert_eq!(join_base(base, path), expected);
	}

	#[rstest]
	#[case("/app", "/app/assets.html", "/assets.html")]
	#[case("/app", "/app", "/")]
	#[case("/app", "/app?x=1", "?x=1")]
	#[case("/app", "/application", "/application")]
	#[case("", "/users.html", "/users.html")]
	fn test_strip_base(#[case] base: &str, #[case] location: &str, #[case] expected: &str) {
		assert_eq!(strip_base(base, location), expected);
	}

	#[rstest]
	fn test_history_state_json() {
		let state = HistoryState::new("/assets.html?scope=1", 2).with_route_name(Some("assets"));
		let json = state.to_json().unwrap();

		assert_eq!(HistoryState::from_json(&json), Some(state));
		assert_eq!(HistoryState::from_json("not json"), None);
	}

	#[rstest]
	fn test_memory_history_starts_at_root() {
		let history = MemoryHistory::new("/app/");

		assert_eq!(history.base(), "/app");
		assert_eq!(history.location(), "/");
		assert_eq!(history.len(), 1);
		assert_eq!(history.position(), 0);
		assert_eq!(history.href("/users.html"), "/app/users.html");
	}

	#[rstest]
	fn test_memory_history_push_and_go() {
		let mut history = MemoryHistory::default();
		history.push("/assets.html", Some("assets")).unwrap();
		history.push("/users.html", Some("users")).unwrap();

		assert_eq!(history.len(), 3);
		assert_eq!(history.peek(-2).map(|s| s.path.as_str()), Some("/"));
		assert!(history.peek(1).is_none());
		assert!(history.peek(-3).is_none());

		history.go(-1).unwrap();
		assert_eq!(history.location(), "/assets.html");
		assert_eq!(history.current().route_name.as_deref(), Some("assets"));

		history.go(1).unwrap();
		assert_eq!(history.location(), "/users.html");
	}

	#[rstest]
	fn test_memory_history_push_truncates_forward_entries() {
		let mut history = MemoryHistory::default();
		history.push("/a.html", None).unwrap();
		history.push("/b.html", None).unwrap();
		history.go(-2).unwrap();

		history.push("/c.html", None).unwrap();

		let paths: Vec<_> = history.entries().iter().map(|s| s.path.as_str()).collect();
		assert_eq!(paths, vec!["/", "/c.html"]);
		assert_eq!(history.current().position, 1);
	}

	#[rstest]
	fn test_memory_history_replace() {
		let mut history = MemoryHistory::default();
		history.replace("/", Some("login")).unwrap();

		assert_eq!(history.len(), 1);
		assert_eq!(history.current().route_name.as_deref(), Some("login"));
	}

	#[rstest]
	#[case(-1)]
	#[case(1)]
	fn test_memory_history_go_out_of_bounds(#[case] delta: isize) {
		let mut history = MemoryHistory::default();

		assert_eq!(history.go(delta), Err(RouterError::HistoryBoundary(delta)));
		assert_eq!(history.position(), 0);
	}

	#[rstest]
	fn test_memory_history_restore_known_entry() {
		let mut history = MemoryHistory::default();
		history.push("/a.html", None).unwrap();

		history.restore(&HistoryState::new("/", 0));

		assert_eq!(history.location(), "/");
		assert_eq!(history.len(), 2);
		assert!(!history.consume_pending_pop());
	}

	#[rstest]
	#[case(HistoryState::new("/assets.html", 2))]
	#[case(HistoryState::new("/assets.html", 0))]
	fn test_memory_history_restore_unknown_entry_reseeds(#[case] state: HistoryState) {
		let mut history = MemoryHistory::with_location("", "/users.html");

		history.restore(&state.clone().with_route_name(Some("assets")));

		assert_eq!(history.len(), 1);
		assert_eq!(history.position(), 0);
		assert_eq!(history.location(), "/assets.html");
		assert_eq!(history.current().route_name.as_deref(), Some("assets"));
		assert_eq!(history.current().position, 0);
	}
}
