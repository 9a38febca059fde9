//! View components of the risk-assessment application.
//!
//! The router treats views as opaque components; only their names are
//! visible here. Each view has a loader returning a [`ViewFuture`], invoked
//! the first time its route is visited.

use risk_assessment_router::{View, ViewFuture, ViewHandle};
use std::sync::Arc;

/// Declares a view component and its lazy loader.
macro_rules! views {
	($($(#[$meta:meta])* $view:ident => $loader:ident;)+) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
			pub struct $view;

			impl View for $view {
				fn name(&self) -> &str {
					stringify!($view)
				}
			}

			#[doc = concat!("Loads [`", stringify!($view), "`].")]
			pub fn $loader() -> ViewFuture {
				Box::pin(async {
					tracing::debug!(view = stringify!($view), "loading view module");
					Ok(Arc::new($view) as ViewHandle)
				})
			}
		)+
	};
}

views! {
	/// Sign-in page.
	LoginView => load_login_view;
	/// Account registration page.
	RegistrationView => load_registration_view;
	/// Asset inventory of a scope.
	AssetsView => load_assets_view;
	/// Risk assessment of a scope's assets.
	RiskAssessmentView => load_risk_assessment_view;
	/// Scope management.
	ScopesView => load_scopes_view;
	/// User administration.
	UsersView => load_users_view;
}
