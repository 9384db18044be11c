//! Shared types used across the generator, renderers and server.
//!
//! A [`UrlRecord`] is produced by [`crate::sitemap::url_set`] and consumed by
//! the sitemap renderer, the page generator, the CLI output and `urls.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sitemap `changefreq` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
        }
    }
}

/// Category of a generated URL. Each tier has a fixed priority policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// `/`, `/about`, `/services`, ...
    Core,
    /// `/services/{service}`
    Service,
    /// `/locations/{province}`
    Province,
    /// `/locations/{province}/{service}`
    ProvinceService,
    /// `/locations/{province}/{city}`
    City,
    /// `/locations/{province}/{city}/{key}`
    CityService,
    /// `/blog/{post}`
    Blog,
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::Core,
        Tier::Service,
        Tier::Province,
        Tier::ProvinceService,
        Tier::City,
        Tier::CityService,
        Tier::Blog,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Core => "core",
            Tier::Service => "service",
            Tier::Province => "province",
            Tier::ProvinceService => "province × service",
            Tier::City => "province × city",
            Tier::CityService => "province × city × service",
            Tier::Blog => "blog",
        }
    }
}

/// One public URL of the site. Generated fresh, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Site-relative path, always starting with `/`
    pub path: String,
    /// Relative SEO importance in `0.0..=1.0`
    pub priority: f64,
    pub change_frequency: ChangeFrequency,
    pub last_modified: DateTime<Utc>,
    pub tier: Tier,
}
