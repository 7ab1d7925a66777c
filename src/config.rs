//! Service configuration.
//!
//! Layers, later wins: built-in defaults, `config.toml` in the working
//! directory, then `CATALOG_`-prefixed environment variables with `__`
//! separating sections (e.g. `CATALOG_BASIC__ADMIN_KEY`).

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Shared secret for admin writes. Empty disables every write route.
    pub admin_key: String,
    pub cors_origin: Option<String>,
    pub body_limit: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:catalog.sqlite".to_string(),
            loglevel: "info".to_string(),
            admin_key: String::new(),
            cors_origin: None,
            body_limit: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 200,
        }
    }
}

impl CatalogConfig {
    /// Resolve a requested page size against the configured bounds.
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("CATALOG_").split("__"))
    }

    pub fn load() -> Result<Self, CatalogError> {
        Ok(Self::figment().extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped() {
        let cfg = CatalogConfig::default();
        assert_eq!(cfg.page_size(None), 50);
        assert_eq!(cfg.page_size(Some(0)), 1);
        assert_eq!(cfg.page_size(Some(10_000)), 200);
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CATALOG_BASIC__ADMIN_KEY", "s3cret");
            jail.set_env("CATALOG_CATALOG__MAX_PAGE_SIZE", "25");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.basic.admin_key, "s3cret");
            assert_eq!(cfg.catalog.max_page_size, 25);
            assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [basic]
                loglevel = "debug"
                admin_key = "from-file"
                "#,
            )?;
            jail.set_env("CATALOG_BASIC__ADMIN_KEY", "from-env");
            let cfg: Config = Config::figment().extract()?;
            assert_eq!(cfg.basic.loglevel, "debug");
            assert_eq!(cfg.basic.admin_key, "from-env");
            Ok(())
        });
    }
}
