//! Site configuration module.
//!
//! Handles loading and validating `config.toml` and the optional
//! `redirects.toml`, both read from the content root.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (required)
//! ├── redirects.toml           # Redirect manifest (optional)
//! ├── index.md
//! └── 1_blog/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "My Site"
//! domain = "example.com"
//! base_url = "https://example.com"   # required
//! email = "me@example.com"
//! github = "me"
//! linkedin = "me"
//! twitter = "me"
//! template = "default"               # templates/<template>/assets/ is copied
//! templates_dir = "templates"        # relative to the content root's parent
//! analytics = ""                     # raw HTML inserted into <head>
//! favicon = "/favicon.ico"
//! og_type = "website"                # default social card type
//! og_image = ""                      # default social card image
//!
//! [processing]
//! max_processes = 4                  # omit for auto = CPU cores
//! ```
//!
//! User values are merged on top of the stock defaults, so the file only
//! needs the keys it wants to change. Unknown keys are rejected to catch
//! typos early.
//!
//! ## Redirects
//!
//! ```toml
//! [[redirect]]
//! from = "old/post"
//! to = "https://example.com/blog/notes/post"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Site config file name, looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";
/// Redirect manifest file name, looked up in the content root.
pub const REDIRECTS_FILE: &str = "redirects.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    Missing(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site-wide configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, shown in the header and in `<title>`.
    pub title: String,
    /// Bare domain, used for display.
    pub domain: String,
    /// Public base URL every canonical URL is built from.
    pub base_url: String,
    /// Contact address shown in the footer.
    pub email: String,
    /// GitHub user name.
    pub github: String,
    /// LinkedIn profile name.
    pub linkedin: String,
    /// Twitter handle, without `@`.
    pub twitter: String,
    /// Template whose assets are copied into the output root.
    pub template: String,
    /// Directory holding templates, relative to the content root's parent.
    pub templates_dir: String,
    /// Analytics snippet, inserted verbatim into every `<head>`.
    pub analytics: String,
    /// Favicon URL.
    pub favicon: String,
    /// Default `og:type` for pages without `ogtype` front matter.
    pub og_type: String,
    /// Default `og:image` for pages without `ogimage` front matter.
    pub og_image: String,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            domain: String::new(),
            base_url: String::new(),
            email: String::new(),
            github: String::new(),
            linkedin: String::new(),
            twitter: String::new(),
            template: "default".to_string(),
            templates_dir: "templates".to_string(),
            analytics: String::new(),
            favicon: "/favicon.ico".to_string(),
            og_type: "website".to_string(),
            og_image: String::new(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate required values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("base_url must be set".into()));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Template assets directory for a given content root.
    pub fn template_assets_dir(&self, source_root: &Path) -> PathBuf {
        source_root
            .parent()
            .unwrap_or(Path::new("."))
            .join(&self.templates_dir)
            .join(&self.template)
            .join("assets")
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// One declared redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Redirect {
    /// Path under the output root the old URL pointed at.
    pub from: String,
    /// Target URL.
    pub to: String,
}

/// Ordered redirect manifest from `redirects.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedirectManifest {
    #[serde(rename = "redirect")]
    pub redirects: Vec<Redirect>,
}

impl RedirectManifest {
    /// Every `from` must stay inside the output root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for redirect in &self.redirects {
            let from = redirect.from.trim_start_matches('/');
            let escapes = Path::new(from)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
            if from.is_empty() || escapes {
                return Err(ConfigError::Validation(format!(
                    "redirect source must be a path inside the site: {:?}",
                    redirect.from
                )));
            }
            if redirect.to.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "redirect from {:?} has an empty target",
                    redirect.from
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from the content root.
///
/// The file is required: a site without a base URL cannot produce
/// canonical URLs, so a missing file aborts the build.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Err(ConfigError::Missing(config_path));
    }
    let content = fs::read_to_string(&config_path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    let config: SiteConfig = merge_toml(stock_defaults_value(), overlay).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `redirects.toml` from the content root, if present.
pub fn load_redirects(root: &Path) -> Result<RedirectManifest, ConfigError> {
    let path = root.join(REDIRECTS_FILE);
    if !path.is_file() {
        return Ok(RedirectManifest::default());
    }
    let content = fs::read_to_string(&path)?;
    let manifest: RedirectManifest = toml::from_str(&content)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# quire configuration
# ====================
# Place this file at the root of the content directory.
# Only base_url is required; every other value shown is the default.
# Unknown keys will cause an error.

# Site title, shown in the header and the browser tab.
title = ""

# Bare domain, for display.
domain = ""

# Public base URL. Canonical URLs and the sitemap are built from it.
base_url = "https://example.com"

# Contact and social handles, shown in the footer when set.
email = ""
github = ""
linkedin = ""
twitter = ""

# Template whose assets/ directory is copied to the output root.
# Resolved as <content parent>/<templates_dir>/<template>/assets/.
template = "default"
templates_dir = "templates"

# Raw HTML inserted into every <head> (analytics, verification tags).
analytics = ""

favicon = "/favicon.ico"

# Social card defaults, used when a page has no ogtype/ogimage front matter.
og_type = "website"
og_image = ""

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
