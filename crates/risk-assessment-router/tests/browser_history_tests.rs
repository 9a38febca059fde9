//! Browser history tests
//!
//! Exercise `BrowserHistory` and the popstate listener against a real
//! `window.history`. Run with `wasm-pack test --headless --firefox`.
//!
//! All tests share one page, so every test starts by creating a fresh
//! history under its own base path.

#[cfg(target_arch = "wasm32")]
mod browser_history_tests {
	use gloo_timers::future::TimeoutFuture;
	use risk_assessment_router::{
		BrowserHistory, History, HistoryState, NamedView, Router, RouterError, View, ViewFuture,
	};
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn view(name: &'static str) -> impl Fn() -> ViewFuture + Send + Sync + 'static {
		move || -> ViewFuture { Box::pin(async move { Ok(NamedView::new(name).into_handle()) }) }
	}

	fn window_history() -> web_sys::History {
		web_sys::window().unwrap().history().unwrap()
	}

	fn browser_state() -> Option<HistoryState> {
		window_history()
			.state()
			.unwrap()
			.as_string()
			.and_then(|json| HistoryState::from_json(&json))
	}

	fn browser_pathname() -> String {
		web_sys::window().unwrap().location().pathname().unwrap()
	}

	/// Builds a router listening for popstate, kept alive for the page.
	fn listening_router(base: &str) -> &'static Router {
		let router = Router::builder()
			.named_route("login", "/", view("LoginView"))
			.named_route("assets", "/assets.html", view("AssetsView"))
			.named_route("scope", "/scopes.html", view("ScopesView"))
			.named_route("users", "/users.html", view("UsersView"))
			.history(BrowserHistory::new(base).unwrap())
			.build()
			.unwrap();
		let router: &'static Router = Box::leak(Box::new(router));
		assert!(router.setup_history_listener());
		router
	}

	async fn wait_for_view(router: &Router, name: &str) -> bool {
		for _ in 0..50 {
			if router.mounted_view().is_some_and(|view| view.name() == name) {
				return true;
			}
			TimeoutFuture::new(20).await;
		}
		false
	}

	#[wasm_bindgen_test]
	fn test_push_and_replace_write_history_state() {
		let mut history = BrowserHistory::new("/risk").unwrap();

		history.push("/assets.html?scope=1", Some("assets")).unwrap();
		assert_eq!(browser_pathname(), "/risk/assets.html");
		assert_eq!(
			browser_state(),
			Some(HistoryState::new("/assets.html?scope=1", 1).with_route_name(Some("assets")))
		);

		history.replace("/users.html", Some("users")).unwrap();
		assert_eq!(browser_pathname(), "/risk/users.html");
		assert_eq!(
			browser_state(),
			Some(HistoryState::new("/users.html", 1).with_route_name(Some("users")))
		);
		assert_eq!(history.len(), 2);
	}

	#[wasm_bindgen_test]
	fn test_new_writes_current_location() {
		let history = BrowserHistory::new("/seed").unwrap();

		assert_eq!(history.len(), 1);
		assert_eq!(browser_state().map(|state| state.position), Some(0));
		assert!(browser_pathname().starts_with("/seed"));
	}

	#[wasm_bindgen_test]
	fn test_rejected_push_keeps_stack() {
		let mut history = BrowserHistory::new("").unwrap();
		let location = history.location().to_string();

		// pushState refuses URLs on another origin
		let err = history.push("//other.example/page.html", None).unwrap_err();

		assert!(matches!(err, RouterError::NavigationFailed(_)));
		assert_eq!(history.len(), 1);
		assert_eq!(history.location(), location);
	}

	#[wasm_bindgen_test]
	fn test_go_beyond_stack_is_rejected() {
		let mut history = BrowserHistory::new("/risk").unwrap();

		assert_eq!(history.go(-1), Err(RouterError::HistoryBoundary(-1)));
		assert_eq!(history.go(isize::MAX), Err(RouterError::HistoryBoundary(isize::MAX)));
		assert_eq!(history.position(), 0);
		assert!(!history.consume_pending_pop());
	}

	#[wasm_bindgen_test]
	async fn test_router_go_ignores_its_own_popstate() {
		let router = listening_router("/own");
		router.replace("login").await.unwrap();
		router.push("assets").await.unwrap();

		router.back().await.unwrap();
		TimeoutFuture::new(100).await;

		assert_eq!(router.location(), "/");
		assert_eq!(router.history_len(), 2);
		assert!(wait_for_view(router, "LoginView").await);
	}

	#[wasm_bindgen_test]
	async fn test_browser_back_and_forward_remount() {
		let router = listening_router("/buttons");
		router.replace("login").await.unwrap();
		router.push("users").await.unwrap();

		window_history().back().unwrap();
		assert!(wait_for_view(router, "LoginView").await);
		assert_eq!(router.location(), "/");

		window_history().forward().unwrap();
		assert!(wait_for_view(router, "UsersView").await);
		assert_eq!(router.location(), "/users.html");
		assert_eq!(router.history_len(), 2);
	}

	#[wasm_bindgen_test]
	async fn test_back_after_reload_mounts_previous_entry() {
		let first_load = Router::builder()
			.named_route("login", "/", view("LoginView"))
			.named_route("assets", "/assets.html", view("AssetsView"))
			.named_route("scope", "/scopes.html", view("ScopesView"))
			.history(BrowserHistory::new("/reload").unwrap())
			.build()
			.unwrap();
		first_load.replace("login").await.unwrap();
		first_load.push("assets").await.unwrap();
		first_load.push("scope").await.unwrap();

		// A reload starts over with a single entry at the same location.
		let router = listening_router("/reload");
		router.sync_with_location().await.unwrap();
		assert_eq!(router.history_len(), 1);
		assert!(wait_for_view(router, "ScopesView").await);

		window_history().back().unwrap();
		assert!(wait_for_view(router, "AssetsView").await);
		assert_eq!(router.location(), "/assets.html");
		assert_eq!(browser_pathname(), "/reload/assets.html");

		window_history().forward().unwrap();
		assert!(wait_for_view(router, "ScopesView").await);
		assert_eq!(router.location(), "/scopes.html");
	}
}
