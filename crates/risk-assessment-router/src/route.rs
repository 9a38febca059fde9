//! Route definitions and the route table.

use crate::error::RouterError;
use crate::loader::LazyView;
use crate::view::ViewFuture;
use std::collections::HashMap;

/// A single route definition: a literal path, a unique name and a lazily
/// loaded view.
pub struct RouteDefinition {
	/// The literal path, e.g. `/assets.html`.
	path: String,
	/// Name used for programmatic navigation.
	name: String,
	/// The lazily loaded view.
	view: LazyView,
}

impl std::fmt::Debug for RouteDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDefinition")
			.field("path", &self.path)
			.field("name", &self.name)
			.field("loaded", &self.view.is_loaded())
			.finish()
	}
}

impl RouteDefinition {
	/// Creates a route definition.
	pub fn new<F>(path: impl Into<String>, name: impl Into<String>, loader: F) -> Self
	where
		F: Fn() -> ViewFuture + Send + Sync + 'static,
	{
		Self::with_view(path, name, LazyView::new(loader))
	}

	/// Creates a route definition around an existing [`LazyView`].
	pub fn with_view(path: impl Into<String>, name: impl Into<String>, view: LazyView) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			view,
		}
	}

	/// Returns the route path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the route name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the route's lazily loaded view.
	pub fn view(&self) -> &LazyView {
		&self.view
	}
}

/// Path comparison options.
///
/// The defaults tolerate a single trailing slash and compare paths
/// ASCII case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
	/// Require the trailing slash to match exactly.
	pub strict: bool,
	/// Compare paths case-sensitively.
	pub sensitive: bool,
}

impl MatchOptions {
	/// Options for exact, case-sensitive matching.
	pub fn exact() -> Self {
		Self {
			strict: true,
			sensitive: true,
		}
	}

	/// Checks whether `path` matches the literal `pattern`.
	///
	/// Query string and hash are ignored.
	pub fn matches(&self, pattern: &str, path: &str) -> bool {
		let path = location_path(path);
		let (pattern, path) = if self.strict {
			(pattern, path)
		} else {
			(trim_trailing_slash(pattern), trim_trailing_slash(path))
		};

		if self.sensitive {
			pattern == path
		} else {
			pattern.eq_ignore_ascii_case(path)
		}
	}
}

/// Returns the path part of a location, without query string or hash.
///
/// An empty path is treated as `/`.
pub fn location_path(location: &str) -> &str {
	match split_location(location).0 {
		"" => "/",
		path => path,
	}
}

/// Splits a location into its path and its query string plus hash.
pub fn split_location(location: &str) -> (&str, &str) {
	location.split_at(location.find(['?', '#']).unwrap_or(location.len()))
}

fn trim_trailing_slash(path: &str) -> &str {
	if path.len() > 1 {
		path.strip_suffix('/').unwrap_or(path)
	} else {
		path
	}
}

/// Ordered, immutable table of route definitions.
///
/// Paths and names are unique; both are checked when the table is built.
pub struct RouteTable {
	/// Registered routes in declaration order.
	routes: Vec<RouteDefinition>,
	/// Named routes for lookups by name.
	named_routes: HashMap<String, usize>,
	/// Path comparison options.
	options: MatchOptions,
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field("routes", &self.routes)
			.field("options", &self.options)
			.finish()
	}
}

impl RouteTable {
	/// Builds a table with default [`MatchOptions`].
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPath`] for a path that does not start
	/// with `/`, [`RouterError::DuplicatePath`] or
	/// [`RouterError::DuplicateName`] if two definitions collide.
	pub fn new(routes: Vec<RouteDefinition>) -> Result<Self, RouterError> {
		Self::with_options(routes, MatchOptions::default())
	}

	/// Builds a table with the given [`MatchOptions`].
	///
	/// Two paths collide if they would match the same location under
	/// `options`.
	pub fn with_options(
		routes: Vec<RouteDefinition>,
		options: MatchOptions,
	) -> Result<Self, RouterError> {
		let mut named_routes = HashMap::with_capacity(routes.len());

		for (index, route) in routes.iter().enumerate() {
			if !route.path.starts_with('/') || route.path.contains(['?', '#']) {
				return Err(RouterError::InvalidPath(route.path.clone()));
			}
			if routes[..index]
				.iter()
				.any(|earlier| options.matches(&earlier.path, &route.path))
			{
				return Err(RouterError::DuplicatePath(route.path.clone()));
			}
			if named_routes.insert(route.name.clone(), index).is_some() {
				return Err(RouterError::DuplicateName(route.name.clone()));
			}
		}

		Ok(Self {
			routes,
			named_routes,
			options,
		})
	}

	/// Returns the first route whose path matches `path`.
	pub fn resolve(&self, path: &str) -> Option<&RouteDefinition> {
		self.routes
			.iter()
			.find(|route| self.options.matches(&route.path, path))
	}

	/// Returns the route registered under `name`.
	pub fn by_name(&self, name: &str) -> Option<&RouteDefinition> {
		self.named_routes.get(name).map(|&index| &self.routes[index])
	}

	/// Returns the path comparison options.
	pub fn options(&self) -> MatchOptions {
		self.options
	}

	/// Iterates over the routes in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &RouteDefinition> {
		self.routes.iter()
	}

	/// Returns the number of routes.
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns `true` if the table has no routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::view::NamedView;
	use rstest::rstest;

	fn route(path: &str, name: &str) -> RouteDefinition {
		let view = NamedView::new(name);
		RouteDefinition::new(path, name, move || -> ViewFuture {
			let view = view.clone();
			Box::pin(async move { Ok(view.into_handle()) })
		})
	}

	fn table() -> RouteTable {
		RouteTable::new(vec![
			route("/", "home"),
			route("/assets.html", "assets"),
			route("/users.html", "users"),
		])
		.unwrap()
	}

	#[rstest]
	#[case("/", "home")]
	#[case("/assets.html", "assets")]
	#[case("/users.html", "users")]
	#[case("/assets.html?scope=3", "assets")]
	#[case("/users.html#top", "users")]
	#[case("/assets.html/", "assets")]
	#[case("/ASSETS.html", "assets")]
	#[case("", "home")]
	fn test_resolve_default_options(#[case] path: &str, #[case] expected: &str) {
		let table = table();
		assert_eq!(table.resolve(path).map(|r| r.name()), Some(expected));
	}

	#[rstest]
	#[case("/unknown.html")]
	#[case("/assets")]
	#[case("/assets.html.bak")]
	fn test_resolve_unknown(#[case] path: &str) {
		assert!(table().resolve(path).is_none());
	}

	#[rstest]
	fn test_resolve_exact_options() {
		let table = RouteTable::with_options(
			vec![route("/", "home"), route("/assets.html", "assets")],
			MatchOptions::exact(),
		)
		.unwrap();

		assert!(table.resolve("/assets.html").is_some());
		assert!(table.resolve("/assets.html/").is_none());
		assert!(table.resolve("/Assets.html").is_none());
	}

	#[rstest]
	fn test_by_name() {
		let table = table();
		assert_eq!(table.by_name("assets").map(|r| r.path()), Some("/assets.html"));
		assert!(table.by_name("missing").is_none());
	}

	#[rstest]
	fn test_duplicate_path_rejected() {
		let err = RouteTable::new(vec![route("/a.html", "a"), route("/a.html", "b")]).unwrap_err();
		assert_eq!(err, RouterError::DuplicatePath("/a.html".to_string()));
	}

	#[rstest]
	fn test_duplicate_path_respects_options() {
		let routes = || vec![route("/a.html", "a"), route("/A.html", "b")];

		assert!(RouteTable::new(routes()).is_err());
		assert!(RouteTable::with_options(routes(), MatchOptions::exact()).is_ok());
	}

	#[rstest]
	fn test_duplicate_name_rejected() {
		let err = RouteTable::new(vec![route("/a.html", "a"), route("/b.html", "a")]).unwrap_err();
		assert_eq!(err, RouterError::DuplicateName("a".to_string()));
	}

	#[rstest]
	#[case("relative.html")]
	#[case("/a.html?x=1")]
	fn test_invalid_path_rejected(#[case] path: &str) {
		let err = RouteTable::new(vec![route(path, "a")]).unwrap_err();
		assert_eq!(err, RouterError::InvalidPath(path.to_string()));
	}

	#[rstest]
	#[case("/assets.html?x=1#y", "/assets.html")]
	#[case("/#hash", "/")]
	#[case("?q", "/")]
	#[case("/users.html", "/users.html")]
	fn test_location_path(#[case] location: &str, #[case] expected: &str) {
		assert_eq!(location_path(location), expected);
	}

	#[rstest]
	#[case("/assets.html?x=1#y", "/assets.html", "?x=1#y")]
	#[case("/users.html#top", "/users.html", "#top")]
	#[case("?q", "", "?q")]
	#[case("/", "/", "")]
	fn test_split_location(#[case] location: &str, #[case] path: &str, #[case] suffix: &str) {
		assert_eq!(split_location(location), (path, suffix));
	}
}
