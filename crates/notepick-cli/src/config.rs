// Copyright 2026 The notepick authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub random: Random,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: CatalogSection::default(),
            ui: Ui::default(),
            random: Random::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub show_details: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Random {
    pub seed: Option<u64>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("NOTEPICK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set NOTEPICK_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(notepick_catalog::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [catalog], [ui], and [random]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "config {} has version {}; expected 1",
                path.display(),
                self.version
            );
        }

        if let Some(catalog_path) = &self.catalog.path {
            notepick_catalog::validate_catalog_path(catalog_path)
                .with_context(|| format!("catalog.path in {}", path.display()))?;
        }

        Ok(())
    }

    /// Catalog file to load, or `None` for the built-in catalog. The
    /// config value wins over the NOTEPICK_CATALOG_PATH environment
    /// override.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.catalog.path {
            return Some(PathBuf::from(path));
        }
        env::var_os("NOTEPICK_CATALOG_PATH").map(PathBuf::from)
    }

    /// Details start hidden unless the config opts in.
    pub fn show_details(&self) -> bool {
        self.ui.show_details.unwrap_or(false)
    }

    pub fn random_seed(&self) -> Option<u64> {
        self.random.seed
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# notepick config\n# Place this file at: {}\n\nversion = 1\n\n[catalog]\n# Optional. The built-in catalog is used when unset\n# path = \"/absolute/path/to/catalog.toml\"\n\n[ui]\n# Start with the detail view visible (hidden by default)\n# show_details = true\n\n[random]\n# Optional. Fix the seed for reproducible random picks\n# seed = 12345\n",
            path.display(),
        )
    }
}
