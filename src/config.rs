//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML value, the user's file is deep-merged on top, and the
//! result is deserialized and validated. The site origin can additionally be
//! overridden from the environment (`SITE_URL`), which always wins.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml     # Site config (overrides stock defaults)
//! └── catalog.toml    # Services, provinces, cities (see `catalog`)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! url = "https://www.venidevelopments.ca"
//! name = "Veni Developments"
//!
//! [sitemap]
//! service_priority = 0.8
//! province_priority = 0.7
//! province_service_priority = 0.6
//! city_priority = 0.6
//! city_service_priority = 0.5
//! blog_priority = 0.7
//! city_services = ["web-development", "app-development", "e-commerce"]
//! cache_control = "public, max-age=86400, stale-while-revalidate=43200"
//!
//! [[sitemap.core_pages]]
//! path = "/"
//! title = "Home"
//! priority = 1.0
//! changefreq = "weekly"
//!
//! [robots]
//! user_agent = "*"
//! allow = ["/"]
//! disallow = ["/private/", "/admin/", "/tmp/", "/drafts/"]
//!
//! [slugs]
//! strict = true
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [[redirects]]
//! source = "/index"
//! destination = "/"
//! permanent = true
//! ```
//!
//! Arrays (core pages, disallow rules, redirects) replace the stock array
//! wholesale. Unknown keys are rejected to catch typos early.

use crate::naming::is_url_safe;
use crate::types::ChangeFrequency;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Production origin used when neither the environment nor `config.toml`
/// provides one.
pub const DEFAULT_SITE_URL: &str = "https://www.venidevelopments.ca";

/// Environment variable that overrides `site.url`.
pub const SITE_URL_ENV: &str = "SITE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public identity of the site (origin, name).
    pub site: SiteSection,
    /// Priority/changefreq policy per URL tier.
    pub sitemap: SitemapConfig,
    /// `robots.txt` rules.
    pub robots: RobotsConfig,
    /// Slug validation policy.
    pub slugs: SlugConfig,
    /// Bind address for `serve`.
    pub server: ServerConfig,
    /// Legacy URLs redirected by the server.
    pub redirects: Vec<Redirect>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Absolute origin every generated path is appended to.
    pub url: String,
    /// Brand name used in page titles.
    pub name: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_SITE_URL.to_string(),
            name: "Veni Developments".to_string(),
        }
    }
}

/// A hand-listed page in the core tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorePage {
    pub path: String,
    pub title: String,
    pub priority: f64,
    pub changefreq: ChangeFrequency,
}

impl CorePage {
    fn new(path: &str, title: &str, priority: f64, changefreq: ChangeFrequency) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            priority,
            changefreq,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    pub core_pages: Vec<CorePage>,
    pub service_priority: f64,
    pub province_priority: f64,
    pub province_service_priority: f64,
    pub city_priority: f64,
    pub city_service_priority: f64,
    pub blog_priority: f64,
    /// Service keys emitted under every city, in order.
    pub city_services: Vec<String>,
    /// `Cache-Control` header sent with the sitemap.
    pub cache_control: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        use ChangeFrequency::{Monthly, Weekly};
        Self {
            core_pages: vec![
                CorePage::new("/", "Home", 1.0, Weekly),
                CorePage::new("/about", "About", 0.8, Monthly),
                CorePage::new("/services", "Services", 0.9, Monthly),
                CorePage::new("/work", "Our Work", 0.8, Monthly),
                CorePage::new("/contact", "Contact", 0.7, Monthly),
                CorePage::new("/blog", "Blog", 0.8, Weekly),
            ],
            service_priority: 0.8,
            province_priority: 0.7,
            province_service_priority: 0.6,
            city_priority: 0.6,
            city_service_priority: 0.5,
            blog_priority: 0.7,
            city_services: vec![
                "web-development".to_string(),
                "app-development".to_string(),
                "e-commerce".to_string(),
            ],
            cache_control: "public, max-age=86400, stale-while-revalidate=43200".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotsConfig {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            user_agent: "*".to_string(),
            allow: vec!["/".to_string()],
            disallow: ["/private/", "/admin/", "/tmp/", "/drafts/"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// How the catalog treats derived slugs.
///
/// Strict mode rejects duplicate service slugs and path segments that would
/// need escaping. Lenient mode keeps first-match-wins shadowing and passes
/// characters through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlugConfig {
    pub strict: bool,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Redirect {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub permanent: bool,
}

pub(crate) fn stock_redirects() -> Vec<Redirect> {
    [
        ("/index", "/"),
        ("/web-design", "/services/web-design"),
        ("/app-development", "/services/app-development-mobile-and-web-apps"),
        ("/digital-marketing", "/services/digital-marketing"),
    ]
    .into_iter()
    .map(|(source, destination)| Redirect {
        source: source.to_string(),
        destination: destination.to_string(),
        permanent: true,
    })
    .collect()
}

impl SiteConfig {
    /// The stock configuration, including the legacy redirects.
    pub fn stock() -> Self {
        Self {
            redirects: stock_redirects(),
            ..Self::default()
        }
    }

    /// Site origin with any trailing `/` removed, ready for path concatenation.
    pub fn origin(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.site.url).map_err(|e| {
            ConfigError::Validation(format!("site.url is not a valid URL ({e}): {}", self.site.url))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::Validation(format!(
                "site.url must be an absolute http(s) URL with a host: {}",
                self.site.url
            )));
        }

        let sitemap = &self.sitemap;
        let tier_priorities = [
            ("sitemap.service_priority", sitemap.service_priority),
            ("sitemap.province_priority", sitemap.province_priority),
            ("sitemap.province_service_priority", sitemap.province_service_priority),
            ("sitemap.city_priority", sitemap.city_priority),
            ("sitemap.city_service_priority", sitemap.city_service_priority),
            ("sitemap.blog_priority", sitemap.blog_priority),
        ];
        for (key, value) in tier_priorities {
            check_priority(key, value)?;
        }
        for page in &sitemap.core_pages {
            check_priority(&format!("sitemap.core_pages[{}].priority", page.path), page.priority)?;
            if !page.path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sitemap.core_pages path must start with '/': {}",
                    page.path
                )));
            }
        }
        if sitemap.city_services.is_empty() {
            return Err(ConfigError::Validation(
                "sitemap.city_services must not be empty".into(),
            ));
        }
        if sitemap.city_services.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Validation(
                "sitemap.city_services entries must not be empty".into(),
            ));
        }
        if self.slugs.strict {
            if let Some(key) = sitemap.city_services.iter().find(|k| !is_url_safe(k)) {
                return Err(ConfigError::Validation(format!(
                    "sitemap.city_services entry is not a URL-safe path segment: {key}"
                )));
            }
        }

        if self.robots.user_agent.is_empty() {
            return Err(ConfigError::Validation(
                "robots.user_agent must not be empty".into(),
            ));
        }

        for redirect in &self.redirects {
            if !redirect.source.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "redirect source must start with '/': {}",
                    redirect.source
                )));
            }
        }
        Ok(())
    }
}

fn check_priority(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{key} must be between 0.0 and 1.0, got {value}"
        )))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock config as a `toml::Value::Table`, the base layer for
/// merging user overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::stock()).expect("stock config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
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

/// Load `{file_name}` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_toml(dir: &Path, file_name: &str) -> Result<Option<toml::Value>, ConfigError> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, apply the site URL override,
/// then deserialize and validate.
///
/// An empty override counts as unset.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
    site_url_override: Option<&str>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    match site_url_override.filter(|url| !url.is_empty()) {
        Some(url) => config.site.url = url.to_string(),
        None => debug!(origin = %config.site.url, "SITE_URL not set, using configured origin"),
    }
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys, applies
/// `site_url_override` (normally the value of [`SITE_URL_ENV`]) and validates
/// the result.
pub fn load_config(root: &Path, site_url_override: Option<&str>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_toml(root, "config.toml")?;
    resolve_config(base, overlay, site_url_override)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# veni-seo Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Arrays replace the stock array wholesale; tables merge key by key.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Origin prepended to every generated path. The SITE_URL environment
# variable overrides this value when set.
url = "https://www.venidevelopments.ca"

# Brand name used in page titles.
name = "Veni Developments"

# ---------------------------------------------------------------------------
# Sitemap policy
# ---------------------------------------------------------------------------
[sitemap]
# Priority per tier (0.0 - 1.0). Every tier except core and blog is monthly.
service_priority = 0.8
province_priority = 0.7
province_service_priority = 0.6
city_priority = 0.6
city_service_priority = 0.5
blog_priority = 0.7

# Service keys emitted under every city: /locations/{province}/{city}/{key}
city_services = ["web-development", "app-development", "e-commerce"]

# Cache-Control header sent with the sitemap by `serve`.
cache_control = "public, max-age=86400, stale-while-revalidate=43200"

# Core pages, listed by hand. changefreq is one of weekly, monthly, yearly.
[[sitemap.core_pages]]
path = "/"
title = "Home"
priority = 1.0
changefreq = "weekly"

[[sitemap.core_pages]]
path = "/about"
title = "About"
priority = 0.8
changefreq = "monthly"

[[sitemap.core_pages]]
path = "/services"
title = "Services"
priority = 0.9
changefreq = "monthly"

[[sitemap.core_pages]]
path = "/work"
title = "Our Work"
priority = 0.8
changefreq = "monthly"

[[sitemap.core_pages]]
path = "/contact"
title = "Contact"
priority = 0.7
changefreq = "monthly"

[[sitemap.core_pages]]
path = "/blog"
title = "Blog"
priority = 0.8
changefreq = "weekly"

# ---------------------------------------------------------------------------
# robots.txt
# ---------------------------------------------------------------------------
[robots]
user_agent = "*"
allow = ["/"]
disallow = ["/private/", "/admin/", "/tmp/", "/drafts/"]

# ---------------------------------------------------------------------------
# Slugs
# ---------------------------------------------------------------------------
[slugs]
# true: duplicate service slugs and segments that need URL escaping are errors.
# false: first matching service wins and characters pass through unescaped.
strict = true

# ---------------------------------------------------------------------------
# Development server
# ---------------------------------------------------------------------------
[server]
host = "127.0.0.1"
port = 3000

# ---------------------------------------------------------------------------
# Redirects (served as 308 when permanent, 307 otherwise)
# ---------------------------------------------------------------------------
[[redirects]]
source = "/index"
destination = "/"
permanent = true

[[redirects]]
source = "/web-design"
destination = "/services/web-design"
permanent = true

[[redirects]]
source = "/app-development"
destination = "/services/app-development-mobile-and-web-apps"
permanent = true

[[redirects]]
source = "/digital-marketing"
destination = "/services/digital-marketing"
permanent = true
"##
}
