//! # Risk Assessment Router
//!
//! Client-side router for the risk-assessment single-page application.
//!
//! A [`Router`] maps literal URL paths to lazily loaded views. Navigating to
//! a route loads its view on first use, caches it for the lifetime of the
//! router, mounts it and records the location in a [`History`] stack scoped
//! under a configurable base path.
//!
//! ## Example
//!
//! ```
//! use risk_assessment_router::{NamedView, Router, ViewFuture};
//!
//! fn login() -> ViewFuture {
//!     Box::pin(async { Ok(NamedView::new("LoginView").into_handle()) })
//! }
//!
//! let router = Router::builder()
//!     .named_route("login", "/", login)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(router.reverse("login").unwrap(), "/");
//! ```

pub mod error;
pub mod history;
pub mod loader;
pub mod route;
pub mod router;
pub mod settings;
pub mod view;

pub use crate::router::{
	CurrentRoute, NOT_FOUND_ROUTE, NavigationOutcome, NavigationTarget, Router, RouterBuilder,
};
pub use error::{RouterError, ViewLoadError};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{History, HistoryState, MemoryHistory, NavigationType, normalize_base};
pub use loader::LazyView;
pub use route::{MatchOptions, RouteDefinition, RouteTable};
pub use settings::{RouterSettings, SettingsError};
pub use view::{NamedView, View, ViewFuture, ViewHandle, ViewLoader};

