//! Layered client configuration.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars, then validates the result once at startup.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analytics::AnalyticsContext;
use crate::error::{Error, Result};
use crate::theme::Theme;

/// Largest page the suggest endpoint accepts.
pub const MAX_SUGGEST_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub api: ApiConfig,
    pub suggest: SuggestConfig,
    pub analytics: AnalyticsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: "http://127.0.0.1:5000/api".to_string(), timeout_ms: 10_000 }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Quiet period after the last keystroke before a lookup fires.
    pub debounce_ms: u64,
    pub limit: usize,
    /// Delay between losing focus and hiding the panel, so a click on a candidate lands first.
    pub blur_close_ms: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self { debounce_ms: 180, limit: 8, blur_close_ms: 100 }
    }
}

impl SuggestConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn blur_close(&self) -> Duration {
        Duration::from_millis(self.blur_close_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub collection: String,
    pub api_key: Option<String>,
    pub index: String,
    pub search_application: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        let ctx = AnalyticsContext::default();
        Self {
            enabled: false,
            endpoint: None,
            collection: "tracking-search".to_string(),
            api_key: None,
            index: ctx.index,
            search_application: ctx.search_application,
        }
    }
}

impl AnalyticsConfig {
    pub fn context(&self) -> AnalyticsContext {
        AnalyticsContext { index: self.index.clone(), search_application: self.search_application.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Used when no preference has been saved yet.
    pub theme: Theme,
    pub placeholder_image: String,
    pub theme_file: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            placeholder_image: "/placeholder-product.svg".to_string(),
            theme_file: "~/.config/storefront/theme".to_string(),
        }
    }
}

impl UiConfig {
    pub fn theme_path(&self) -> PathBuf {
        expand_path(&self.theme_file)
    }
}

impl StorefrontConfig {
    pub fn load() -> Result<Self> {
        Self::load_for_env(None)
    }

    pub fn load_for_env(env: Option<&str>) -> Result<Self> {
        let env_name = env_name(env);
        let config: Self = Self::figment(&env_name, None).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`StorefrontConfig::load`] with an explicit file layered over the defaults and
    /// environment files, below `APP_*` variables.
    pub fn load_from(path: &Path) -> Result<Self> {
        let env_name = env_name(None);
        let config: Self = Self::figment(&env_name, Some(path)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults ← `config.toml` ← `config.<env>.toml` ← `extra` ← `APP_*` (nested keys split on `__`).
    pub fn figment(env_name: &str, extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default())).merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("api.base_url must not be empty".into()));
        }
        if self.suggest.limit == 0 || self.suggest.limit > MAX_SUGGEST_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "suggest.limit must be between 1 and {MAX_SUGGEST_LIMIT}, got {}",
                self.suggest.limit
            )));
        }
        if self.analytics.enabled && self.analytics.endpoint.as_deref().map_or(true, |e| e.trim().is_empty()) {
            return Err(Error::InvalidConfig("analytics.endpoint is required when analytics is enabled".into()));
        }
        Ok(())
    }
}

fn env_name(explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .unwrap_or_else(|| env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string()))
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
