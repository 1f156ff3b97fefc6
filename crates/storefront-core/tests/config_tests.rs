use figment::Jail;
use std::path::Path;

use storefront_core::config::{expand_path, StorefrontConfig};
use storefront_core::theme::Theme;

#[test]
fn defaults_apply_without_any_file() {
    Jail::expect_with(|_jail| {
        let config = StorefrontConfig::load_for_env(Some("dev")).map_err(|e| e.to_string())?;

        assert_eq!(config.api.base_url, "http://127.0.0.1:5000/api");
        assert_eq!(config.suggest.debounce_ms, 180, "debounce quiet period");
        assert_eq!(config.suggest.limit, 8, "suggestion page size");
        assert_eq!(config.suggest.blur_close_ms, 100);
        assert_eq!(config.ui.theme, Theme::Light);
        assert!(!config.analytics.enabled);
        Ok(())
    });
}

#[test]
fn env_file_overrides_base_and_env_vars_override_both() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [api]
            base_url = "http://search.local/api"

            [suggest]
            limit = 5
            "#,
        )?;
        jail.create_file(
            "config.prod.toml",
            r#"
            [suggest]
            debounce_ms = 250
            "#,
        )?;
        jail.set_env("APP_SUGGEST__LIMIT", "3");
        jail.set_env("APP_UI__THEME", "dark");

        let config = StorefrontConfig::load_for_env(Some("prod")).map_err(|e| e.to_string())?;

        assert_eq!(config.api.base_url, "http://search.local/api");
        assert_eq!(config.suggest.debounce_ms, 250, "env-specific file wins over config.toml");
        assert_eq!(config.suggest.limit, 3, "APP_* variables win over files");
        assert_eq!(config.ui.theme, Theme::Dark);
        Ok(())
    });
}

#[test]
fn explicit_file_is_layered_over_env_files() {
    Jail::expect_with(|jail| {
        jail.create_file("config.dev.toml", "[api]\ntimeout_ms = 500\n")?;
        jail.create_file("custom.toml", "[api]\ntimeout_ms = 750\n")?;
        jail.set_env("RUST_ENV", "dev");

        let config = StorefrontConfig::load_from(Path::new("custom.toml")).map_err(|e| e.to_string())?;
        assert_eq!(config.api.timeout_ms, 750);
        Ok(())
    });
}

#[test]
fn validation_rejects_out_of_range_limit() {
    Jail::expect_with(|jail| {
        jail.set_env("APP_SUGGEST__LIMIT", "50");
        let err = StorefrontConfig::load_for_env(Some("test")).expect_err("limit above backend bound");
        assert!(err.to_string().contains("suggest.limit"), "unexpected error: {err}");
        Ok(())
    });
}

#[test]
fn validation_requires_endpoint_for_enabled_analytics() {
    let mut config = StorefrontConfig::default();
    config.analytics.enabled = true;
    assert!(config.validate().is_err(), "enabled analytics without endpoint");

    config.analytics.endpoint = Some("https://collector.local".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn expand_path_resolves_env_vars() {
    Jail::expect_with(|jail| {
        jail.set_env("STOREFRONT_TEST_DIR", "/tmp/storefront");
        assert_eq!(expand_path("${STOREFRONT_TEST_DIR}/theme"), Path::new("/tmp/storefront/theme"));
        Ok(())
    });
}
