//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Sections are extracted on demand with [`Config::get`]; every section type
//! carries serde defaults, so a missing file yields working settings.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    /// Directory the config files were read from; relative paths resolve here.
    base_dir: PathBuf,
}

impl Config {
    /// Loads from `$REELMATCH_CONFIG_DIR`, or the working directory.
    pub fn load() -> anyhow::Result<Self> {
        let dir = env::var("REELMATCH_CONFIG_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."));
        Self::load_from(&dir)
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        tracing::debug!(env = %env_name, dir = %dir.display(), "configuration layers merged");
        Ok(Self { figment, base_dir: dir.to_path_buf() })
    }

    pub fn from_figment(figment: Figment, base_dir: impl Into<PathBuf>) -> Self { Self { figment, base_dir: base_dir.into() } }

    /// Builds a config from an inline TOML document. Handy in tests and tools.
    pub fn from_toml_str(toml: &str) -> Self { Self::from_figment(Figment::new().merge(Toml::string(toml)), ".") }

    pub fn base_dir(&self) -> &Path { &self.base_dir }

    /// A path setting expanded and made relative to [`Config::base_dir`].
    pub fn resolve_path(&self, value: &str) -> PathBuf { resolve_with_base(&self.base_dir, value) }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like [`Config::get`], but a missing section falls back to `T::default()`
    /// while present keys still override individual defaults.
    pub fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() { return Ok(T::default()); }
        self.get(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self { Self { path: "data/catalog.json".to_string() } }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub base_url: String,
}

impl Default for ImagesConfig {
    fn default() -> Self { Self { base_url: "https://image.tmdb.org/t/p/w500".to_string() } }
}

impl ImagesConfig {
    pub fn url_for(&self, image_path: &str) -> String { format!("{}{}", self.base_url.trim_end_matches('/'), image_path) }
}

/// Checks that a policy value lies in `[0, 1]`.
pub fn ensure_unit_range(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) { Ok(()) } else { Err(Error::InvalidConfig(format!("{name} must be within [0, 1], got {value}"))) }
}

/// `~` and `$VAR`/`${VAR}` are expanded first; a still-relative path is
/// joined onto `base`. Unset variables leave the text as written.
fn resolve_with_base(base: &Path, value: &str) -> PathBuf {
    let with_env = shellexpand::env(value).unwrap_or(Cow::Borrowed(value));
    let path = PathBuf::from(shellexpand::tilde(&with_env).as_ref());
    if path.is_absolute() { path } else { base.join(path) }
}
