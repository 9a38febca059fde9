//! Router settings.
//!
//! The only deployment-time setting is the base URL the application is
//! served under. It is read from the `BASE_URL` environment variable at
//! runtime, falling back to the value present when the crate was built,
//! and finally to the root.

use crate::history::normalize_base;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the base URL.
pub const BASE_URL_VAR: &str = "BASE_URL";

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file is not valid TOML or has the wrong shape.
	#[error("invalid router settings: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Router settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Base URL path the application is served under.
	pub base_url: String,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			base_url: "/".to_string(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
	#[serde(default)]
	router: RouterSettings,
}

impl RouterSettings {
	/// Loads settings from the environment.
	pub fn from_env() -> Self {
		let base_url = std::env::var(BASE_URL_VAR)
			.ok()
			.or_else(|| option_env!("BASE_URL").map(str::to_string));

		match base_url {
			Some(base_url) => {
				tracing::debug!(base_url = %base_url, "router base URL from environment");
				Self { base_url }
			}
			None => Self::default(),
		}
	}

	/// Parses settings from the `[router]` table of a TOML document.
	///
	/// # Examples
	///
	/// ```
	/// use risk_assessment_router::RouterSettings;
	///
	/// let settings = RouterSettings::from_toml_str("[router]\nbase_url = \"/risk/\"").unwrap();
	/// assert_eq!(settings.base(), "/risk");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let file: SettingsFile = toml::from_str(source)?;
		Ok(file.router)
	}

	/// Sets the base URL.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Normalized base path (`""` for root).
	pub fn base(&self) -> String {
		normalize_base(&self.base_url)
	}
}
