//! # Risk Assessment
//!
//! Client-side routing for the risk-assessment web application.
//!
//! The application serves six pages, each rendered by a lazily loaded
//! view:
//!
//! | Path | Route name | View |
//! |------|------------|------|
//! | `/` | `login` | [`LoginView`](views::LoginView) |
//! | `/registration.html` | `registration` | [`RegistrationView`](views::RegistrationView) |
//! | `/assets.html` | `assets` | [`AssetsView`](views::AssetsView) |
//! | `/riskassessment.html` | `riskassessment` | [`RiskAssessmentView`](views::RiskAssessmentView) |
//! | `/scopes.html` | `scope` | [`ScopesView`](views::ScopesView) |
//! | `/users.html` | `users` | [`UsersView`](views::UsersView) |
//!
//! The base path the application is served under comes from the
//! `BASE_URL` environment variable.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> Result<(), risk_assessment::RouterError> {
//! let router = risk_assessment::start().await?;
//! router.push("assets").await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod routes;
pub mod views;

pub use app::{build_router, router, start};
pub use routes::{ROUTES, RouteEntry, route_table};

pub use risk_assessment_router as routing;
pub use risk_assessment_router::{Router, RouterError, RouterSettings};
