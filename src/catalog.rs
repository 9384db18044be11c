//! Content tables: services, provinces and their cities, blog posts.
//!
//! The catalog is the whole addressable space of the site. It is loaded once,
//! validated, and then passed by reference into the generator, the page
//! renderer and the server. Nothing mutates it afterwards.
//!
//! ## Catalog File
//!
//! The stock tables are compiled in from `static/catalog.toml`. A
//! `catalog.toml` in the content directory is merged on top of them the same
//! way `config.toml` is: a key present in the file replaces the stock key, so
//! a file that only lists `[[provinces]]` keeps the stock services.
//!
//! ```toml
//! blog_posts = ["launch-announcement"]
//!
//! [[services]]
//! title = "Web"
//! subtitle = "Development"          # optional, part of the slug
//! description = "One-line pitch"
//! details = "Markdown body"         # optional
//!
//! [[provinces]]
//! code = "ontario"                  # URL segment
//! name = "Ontario"                  # optional, derived from code
//! description = "Marketing blurb"   # optional, generic sentence if absent
//! cities = ["toronto", "ottawa"]
//! ```
//!
//! ## Validation
//!
//! Always enforced:
//! - province codes are unique
//! - cities are unique within their province
//!
//! Enforced in strict slug mode only:
//! - derived service slugs are unique (otherwise the first service shadows
//!   later ones everywhere a slug is resolved)
//! - every URL segment is made of unreserved lowercase characters
//! - no city shares its path segment with a service slug

use crate::config::{self, ConfigError};
use crate::naming;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

const STOCK_CATALOG: &str = include_str!("../static/catalog.toml");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate province code: {0}")]
    DuplicateProvince(String),
    #[error("Duplicate city '{city}' in province '{province}'")]
    DuplicateCity { province: String, city: String },
    #[error("Services '{first}' and '{second}' both derive the slug '{slug}'")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
    #[error("{kind} '{value}' is not a URL-safe path segment")]
    UnsafeSegment { kind: &'static str, value: String },
    #[error("City '{city}' in province '{province}' has the same path as a service")]
    CityShadowsService { province: String, city: String },
}

/// A service offered by the agency. Its slug is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Markdown body for the service page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Service {
    pub fn slug(&self) -> String {
        naming::slugify(&self.title, self.subtitle.as_deref())
    }

    /// Title and subtitle joined for display.
    pub fn full_title(&self) -> String {
        match self.subtitle.as_deref() {
            Some(sub) if !sub.is_empty() => format!("{} {}", self.title, sub),
            _ => self.title.clone(),
        }
    }
}

/// A province and the cities targeted inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Province {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cities: Vec<String>,
}

impl Province {
    /// Display name, falling back to the title-cased code.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| naming::display_title(&self.code))
    }

    /// Marketing paragraph, falling back to a generic sentence.
    pub fn summary(&self, brand: &str) -> String {
        match &self.description {
            Some(desc) => desc.clone(),
            None => {
                let name = self.display_name();
                format!(
                    "Custom web development and app design services for {name} businesses. \
                     {brand} creates innovative digital solutions tailored to the {name} market."
                )
            }
        }
    }
}

/// The complete, immutable content tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub provinces: Vec<Province>,
    pub blog_posts: Vec<String>,
}

impl Catalog {
    /// The compiled-in agency tables.
    pub fn stock() -> Self {
        toml::from_str(STOCK_CATALOG).expect("stock catalog must parse")
    }

    /// Find a service by slug. When slugs collide the first service wins.
    pub fn find_service(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug() == slug)
    }

    pub fn find_province(&self, code: &str) -> Option<&Province> {
        self.provinces.iter().find(|p| p.code == code)
    }

    /// Total number of (province, city) pairs.
    pub fn city_count(&self) -> usize {
        self.provinces.iter().map(|p| p.cities.len()).sum()
    }

    /// Slugs derived by more than one service, in first-seen order.
    pub fn duplicate_slugs(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for service in &self.services {
            let slug = service.slug();
            if !seen.insert(slug.clone()) && !duplicates.contains(&slug) {
                duplicates.push(slug);
            }
        }
        duplicates
    }

    pub fn validate(&self, strict: bool) -> Result<(), CatalogError> {
        let mut codes = HashSet::new();
        for province in &self.provinces {
            if !codes.insert(province.code.as_str()) {
                return Err(CatalogError::DuplicateProvince(province.code.clone()));
            }
            let mut cities = HashSet::new();
            for city in &province.cities {
                if !cities.insert(city.as_str()) {
                    return Err(CatalogError::DuplicateCity {
                        province: province.code.clone(),
                        city: city.clone(),
                    });
                }
            }
        }

        if !strict {
            return Ok(());
        }

        let mut slugs: Vec<(String, &Service)> = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let slug = service.slug();
            check_segment("Service slug", &slug)?;
            if let Some((_, first)) = slugs.iter().find(|(s, _)| *s == slug) {
                return Err(CatalogError::DuplicateSlug {
                    slug,
                    first: first.full_title(),
                    second: service.full_title(),
                });
            }
            slugs.push((slug, service));
        }
        for province in &self.provinces {
            check_segment("Province code", &province.code)?;
            for city in &province.cities {
                check_segment("City", city)?;
                if slugs.iter().any(|(slug, _)| slug == city) {
                    return Err(CatalogError::CityShadowsService {
                        province: province.code.clone(),
                        city: city.clone(),
                    });
                }
            }
        }
        for post in &self.blog_posts {
            check_segment("Blog post", post)?;
        }
        Ok(())
    }
}

fn check_segment(kind: &'static str, value: &str) -> Result<(), CatalogError> {
    if naming::is_url_safe(value) {
        Ok(())
    } else {
        Err(CatalogError::UnsafeSegment {
            kind,
            value: value.to_string(),
        })
    }
}

/// The stock catalog file, printed by `gen-catalog`.
pub fn stock_catalog_toml() -> &'static str {
    STOCK_CATALOG
}

/// Load `catalog.toml` from `root` merged over the stock tables, then validate.
pub fn load_catalog(root: &Path, strict: bool) -> Result<Catalog, CatalogError> {
    let base: toml::Value = toml::from_str(STOCK_CATALOG)?;
    let merged = match config::load_raw_toml(root, "catalog.toml")? {
        Some(overlay) => config::merge_toml(base, overlay),
        None => base,
    };
    let catalog: Catalog = merged.try_into()?;
    catalog.validate(strict)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn stock_catalog_parses() {
        let catalog = Catalog::stock();
        assert_eq!(catalog.services.len(), 5);
        assert_eq!(catalog.provinces.len(), 10);
        assert_eq!(catalog.blog_posts.len(), 5);
    }

    #[test]
    fn stock_catalog_is_strictly_valid() {
        Catalog::stock().validate(true).unwrap();
    }

    #[test]
    fn stock_service_slugs() {
        let slugs: Vec<String> = Catalog::stock().services.iter().map(Service::slug).collect();
        assert_eq!(
            slugs,
            vec![
                "web-design",
                "web-development",
                "app-development-mobile-and-web-apps",
                "digital-marketing",
                "branding",
            ]
        );
    }

    #[test]
    fn stock_provinces_in_order() {
        let stock = Catalog::stock();
        let codes: Vec<&str> = stock
            .provinces
            .iter()
            .map(|p| p.code.as_str())
            .collect();
        assert_eq!(codes[0], "ontario");
        assert_eq!(codes[9], "prince-edward-island");
    }

    #[test]
    fn stock_city_lists() {
        let catalog = Catalog::stock();
        let ontario = catalog.find_province("ontario").unwrap();
        assert_eq!(ontario.cities.len(), 10);
        assert_eq!(ontario.cities[0], "toronto");
        let pei = catalog.find_province("prince-edward-island").unwrap();
        assert_eq!(pei.cities, vec!["charlottetown", "summerside", "stratford", "cornwall"]);
        assert_eq!(catalog.city_count(), 69);
    }

    #[test]
    fn full_title_joins_subtitle() {
        let s = service("App Development", Some("Mobile & Web Apps"));
        assert_eq!(s.full_title(), "App Development Mobile & Web Apps");
        assert_eq!(service("Branding", None).full_title(), "Branding");
    }

    #[test]
    fn province_display_name_fallback() {
        let p = province("nova-scotia", &[]);
        assert_eq!(p.display_name(), "Nova Scotia");

        let named = Province {
            name: Some("Newfoundland and Labrador".to_string()),
            ..province("newfoundland-and-labrador", &[])
        };
        assert_eq!(named.display_name(), "Newfoundland and Labrador");
    }

    #[test]
    fn province_summary_fallback_names_province_and_brand() {
        let p = province("yukon", &[]);
        let summary = p.summary("Acme");
        assert!(summary.contains("Yukon businesses"));
        assert!(summary.contains("Acme creates"));
    }

    #[test]
    fn find_service_by_slug() {
        let catalog = Catalog::stock();
        let s = catalog.find_service("digital-marketing").unwrap();
        assert_eq!(s.title, "Digital");
        assert!(catalog.find_service("plumbing").is_none());
    }

    #[test]
    fn find_service_first_match_wins() {
        let catalog = Catalog {
            services: vec![
                Service {
                    description: "first".to_string(),
                    ..service("Web Design", None)
                },
                Service {
                    description: "second".to_string(),
                    ..service("Web", Some("Design"))
                },
            ],
            ..Catalog::default()
        };
        assert_eq!(catalog.find_service("web-design").unwrap().description, "first");
        assert_eq!(catalog.duplicate_slugs(), vec!["web-design"]);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn duplicate_slug_rejected_in_strict_mode() {
        let catalog = Catalog {
            services: vec![service("Web Design", None), service("Web", Some("Design"))],
            ..Catalog::default()
        };
        let err = catalog.validate(true).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSlug { ref slug, .. } if slug == "web-design"));
    }

    #[test]
    fn duplicate_slug_allowed_in_lenient_mode() {
        let catalog = Catalog {
            services: vec![service("Web Design", None), service("Web", Some("Design"))],
            ..Catalog::default()
        };
        assert!(catalog.validate(false).is_ok());
    }

    #[test]
    fn unsafe_slug_rejected_in_strict_mode() {
        let catalog = Catalog {
            services: vec![service("SEO, Ads!", None)],
            ..Catalog::default()
        };
        let err = catalog.validate(true).unwrap_err();
        assert!(matches!(err, CatalogError::UnsafeSegment { kind: "Service slug", .. }));
        assert!(catalog.validate(false).is_ok());
    }

    #[test]
    fn unsafe_city_rejected_in_strict_mode() {
        let catalog = Catalog {
            provinces: vec![province("quebec", &["trois rivières"])],
            ..Catalog::default()
        };
        assert!(catalog.validate(true).is_err());
    }

    #[test]
    fn city_named_like_service_rejected_in_strict_mode() {
        let catalog = Catalog {
            services: vec![service("Branding", None)],
            provinces: vec![province("ontario", &["toronto", "branding"])],
            ..Catalog::default()
        };
        assert!(matches!(
            catalog.validate(true),
            Err(CatalogError::CityShadowsService { ref province, ref city })
                if province == "ontario" && city == "branding"
        ));
        assert!(catalog.validate(false).is_ok());
    }

    #[test]
    fn duplicate_province_always_rejected() {
        let catalog = Catalog {
            provinces: vec![province("ontario", &[]), province("ontario", &[])],
            ..Catalog::default()
        };
        assert!(matches!(
            catalog.validate(false),
            Err(CatalogError::DuplicateProvince(_))
        ));
    }

    #[test]
    fn duplicate_city_always_rejected() {
        let catalog = Catalog {
            provinces: vec![province("ontario", &["toronto", "toronto"])],
            ..Catalog::default()
        };
        assert!(matches!(
            catalog.validate(false),
            Err(CatalogError::DuplicateCity { .. })
        ));
    }

    // =========================================================================
    // load_catalog
    // =========================================================================

    #[test]
    fn load_catalog_without_file_is_stock() {
        let tmp = TempDir::new().unwrap();
        let catalog = load_catalog(tmp.path(), true).unwrap();
        assert_eq!(catalog, Catalog::stock());
    }

    #[test]
    fn load_catalog_replaces_listed_tables_only() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("catalog.toml"),
            r#"
[[provinces]]
code = "ontario"
cities = ["toronto"]
"#,
        )
        .unwrap();

        let catalog = load_catalog(tmp.path(), true).unwrap();
        assert_eq!(catalog.provinces.len(), 1);
        assert_eq!(catalog.provinces[0].display_name(), "Ontario");
        // Services and blog posts stay stock
        assert_eq!(catalog.services.len(), 5);
        assert_eq!(catalog.blog_posts.len(), 5);
    }

    #[test]
    fn load_catalog_rejects_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("catalog.toml"),
            "[[services]]\ntitle = \"X\"\nslug = \"x\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_catalog(tmp.path(), true),
            Err(CatalogError::Toml(_))
        ));
    }

    #[test]
    fn load_catalog_validates() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("catalog.toml"),
            r#"
[[services]]
title = "Web Design"

[[services]]
title = "Web"
subtitle = "Design"
"#,
        )
        .unwrap();
        assert!(load_catalog(tmp.path(), true).is_err());
        assert_eq!(load_catalog(tmp.path(), false).unwrap().services.len(), 2);
    }
}
