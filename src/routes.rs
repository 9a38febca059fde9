//! The application's route table.

use crate::views::{
	load_assets_view, load_login_view, load_registration_view, load_risk_assessment_view,
	load_scopes_view, load_users_view,
};
use risk_assessment_router::{RouteDefinition, RouteTable, RouterError, ViewFuture};

/// A static route entry.
#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
	/// Literal path.
	pub path: &'static str,
	/// Route name.
	pub name: &'static str,
	/// Component name of the route's view.
	pub view: &'static str,
	/// Loader for the route's view.
	pub loader: fn() -> ViewFuture,
}

/// Routes of the application, in matching order.
pub const ROUTES: [RouteEntry; 6] = [
	RouteEntry {
		path: "/",
		name: "login",
		view: "LoginView",
		loader: load_login_view,
	},
	RouteEntry {
		path: "/registration.html",
		name: "registration",
		view: "RegistrationView",
		loader: load_registration_view,
	},
	RouteEntry {
		path: "/assets.html",
		name: "assets",
		view: "AssetsView",
		loader: load_assets_view,
	},
	RouteEntry {
		path: "/riskassessment.html",
		name: "riskassessment",
		view: "RiskAssessmentView",
		loader: load_risk_assessment_view,
	},
	RouteEntry {
		path: "/scopes.html",
		name: "scope",
		view: "ScopesView",
		loader: load_scopes_view,
	},
	RouteEntry {
		path: "/users.html",
		name: "users",
		view: "UsersView",
		loader: load_users_view,
	},
];

impl RouteEntry {
	/// Creates the route definition for this entry.
	pub fn definition(&self) -> RouteDefinition {
		RouteDefinition::new(self.path, self.name, self.loader)
	}
}

/// Route definitions for every entry of [`ROUTES`].
pub fn definitions() -> Vec<RouteDefinition> {
	ROUTES.iter().map(RouteEntry::definition).collect()
}

/// Builds the application's route table.
pub fn route_table() -> Result<RouteTable, RouterError> {
	RouteTable::new(definitions())
}
