//! URL-space generation and sitemap rendering.
//!
//! [`url_set`] enumerates every public URL the site exposes from the catalog
//! and the tier policy in `config.toml`. The same list feeds the sitemap, the
//! static page generator and `urls.json`, so a page exists exactly when the
//! sitemap advertises it.
//!
//! ## Enumeration Order
//!
//! ```text
//! core pages                          /  /about  /services  ...
//! services                            /services/{service}
//! for each province:
//!     province                        /locations/{province}
//!     each service                    /locations/{province}/{service}
//!     for each city:
//!         city                        /locations/{province}/{city}
//!         each fixed service key      /locations/{province}/{city}/{key}
//! blog posts                          /blog/{post}
//! ```
//!
//! ## Uniqueness
//!
//! Paths are unique in the output. A strict catalog can only collide when a
//! city shares a service slug under the same province; a lenient catalog can
//! also collide on duplicate service slugs. In both cases the first record
//! wins and the later one is dropped with a warning.

use crate::catalog::{Catalog, Service};
use crate::config::SiteConfig;
use crate::types::{ChangeFrequency, Tier, UrlRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use maud::{PreEscaped, html};
use std::collections::HashSet;
use tracing::warn;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Accumulates records in order, dropping repeated paths.
struct UrlSetBuilder {
    now: DateTime<Utc>,
    seen: HashSet<String>,
    records: Vec<UrlRecord>,
}

impl UrlSetBuilder {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            seen: HashSet::new(),
            records: Vec::new(),
        }
    }

    fn push(&mut self, path: String, priority: f64, change_frequency: ChangeFrequency, tier: Tier) {
        if !self.seen.insert(path.clone()) {
            warn!(%path, tier = tier.label(), "duplicate path shadowed by an earlier record");
            return;
        }
        self.records.push(UrlRecord {
            path,
            priority,
            change_frequency,
            last_modified: self.now,
            tier,
        });
    }
}

/// Enumerate every public URL of the site, stamped with `now`.
pub fn url_set(catalog: &Catalog, config: &SiteConfig, now: DateTime<Utc>) -> Vec<UrlRecord> {
    use ChangeFrequency::{Monthly, Yearly};

    let policy = &config.sitemap;
    let mut set = UrlSetBuilder::new(now);

    for page in &policy.core_pages {
        set.push(page.path.clone(), page.priority, page.changefreq, Tier::Core);
    }

    let service_slugs: Vec<String> = catalog.services.iter().map(Service::slug).collect();
    for slug in &service_slugs {
        set.push(
            format!("/services/{slug}"),
            policy.service_priority,
            Monthly,
            Tier::Service,
        );
    }

    for province in &catalog.provinces {
        let province_path = format!("/locations/{}", province.code);
        set.push(
            province_path.clone(),
            policy.province_priority,
            Monthly,
            Tier::Province,
        );

        for slug in &service_slugs {
            set.push(
                format!("{province_path}/{slug}"),
                policy.province_service_priority,
                Monthly,
                Tier::ProvinceService,
            );
        }

        for city in &province.cities {
            let city_path = format!("{province_path}/{city}");
            set.push(city_path.clone(), policy.city_priority, Monthly, Tier::City);

            for key in &policy.city_services {
                set.push(
                    format!("{city_path}/{key}"),
                    policy.city_service_priority,
                    Monthly,
                    Tier::CityService,
                );
            }
        }
    }

    for post in &catalog.blog_posts {
        set.push(
            format!("/blog/{post}"),
            policy.blog_priority,
            Yearly,
            Tier::Blog,
        );
    }

    set.records
}

/// Join the site origin and a site-relative path.
pub fn absolute_url(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}

/// `lastmod` value: RFC 3339 UTC with milliseconds, e.g. `2025-03-14T09:26:53.000Z`.
pub fn format_lastmod(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Priority with at least one and at most two decimals: `1.0`, `0.5`, `0.85`.
pub fn format_priority(priority: f64) -> String {
    let fixed = format!("{priority:.2}");
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{trimmed}0")
    } else {
        trimmed.to_string()
    }
}

/// Render records as a sitemap protocol 0.9 `urlset` document.
pub fn render_sitemap(records: &[UrlRecord], origin: &str) -> String {
    let markup = html! {
        (PreEscaped(XML_DECLARATION))
        urlset xmlns=(SITEMAP_NAMESPACE) {
            @for record in records {
                url {
                    loc { (absolute_url(origin, &record.path)) }
                    lastmod { (format_lastmod(record.last_modified)) }
                    changefreq { (record.change_frequency.as_str()) }
                    priority { (format_priority(record.priority)) }
                }
            }
        }
    };
    markup.into_string()
}

/// Number of records per tier, in tier order, skipping empty tiers.
pub fn tier_counts(records: &[UrlRecord]) -> Vec<(Tier, usize)> {
    Tier::ALL
        .iter()
        .map(|&tier| (tier, records.iter().filter(|r| r.tier == tier).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use chrono::Duration;

    fn stock_records() -> (Catalog, Vec<UrlRecord>) {
        let catalog = Catalog::stock();
        let records = url_set(&catalog, &SiteConfig::stock(), fixed_now());
        (catalog, records)
    }

    #[test]
    fn single_province_scenario_emits_exactly_seven_paths() {
        let records = url_set(&ontario_catalog(), &SiteConfig::stock(), fixed_now());
        let generated: Vec<&str> = records
            .iter()
            .filter(|r| r.tier != Tier::Core && r.tier != Tier::Blog)
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(
            generated,
            vec![
                "/services/web-design",
                "/locations/ontario",
                "/locations/ontario/web-design",
                "/locations/ontario/toronto",
                "/locations/ontario/toronto/web-development",
                "/locations/ontario/toronto/app-development",
                "/locations/ontario/toronto/e-commerce",
            ]
        );
    }

    #[test]
    fn core_pages_come_first() {
        let (_, records) = stock_records();
        assert_eq!(
            paths_in_tier(&records, Tier::Core),
            vec!["/", "/about", "/services", "/work", "/contact", "/blog"]
        );
        assert_eq!(records[0].path, "/");
        assert_eq!(records[0].priority, 1.0);
        assert_eq!(records[0].change_frequency, ChangeFrequency::Weekly);
    }

    #[test]
    fn one_province_record_per_province() {
        let (catalog, records) = stock_records();
        for province in &catalog.provinces {
            let path = format!("/locations/{}", province.code);
            assert_eq!(count_path(&records, &path), 1, "{path}");
            assert_eq!(find_record(&records, &path).tier, Tier::Province);
        }
        assert_eq!(paths_in_tier(&records, Tier::Province).len(), catalog.provinces.len());
    }

    #[test]
    fn one_record_per_province_and_service() {
        let (catalog, records) = stock_records();
        for province in &catalog.provinces {
            for service in &catalog.services {
                let path = format!("/locations/{}/{}", province.code, service.slug());
                assert_eq!(count_path(&records, &path), 1, "{path}");
            }
        }
        assert_eq!(
            paths_in_tier(&records, Tier::ProvinceService).len(),
            catalog.provinces.len() * catalog.services.len()
        );
    }

    #[test]
    fn city_and_fixed_service_records() {
        let (catalog, records) = stock_records();
        for province in &catalog.provinces {
            for city in &province.cities {
                let city_path = format!("/locations/{}/{}", province.code, city);
                assert_eq!(count_path(&records, &city_path), 1, "{city_path}");
                for key in ["web-development", "app-development", "e-commerce"] {
                    let path = format!("{city_path}/{key}");
                    assert_eq!(count_path(&records, &path), 1, "{path}");
                    assert_eq!(find_record(&records, &path).tier, Tier::CityService);
                }
            }
        }
        assert_eq!(paths_in_tier(&records, Tier::City).len(), catalog.city_count());
        assert_eq!(
            paths_in_tier(&records, Tier::CityService).len(),
            catalog.city_count() * 3
        );
    }

    #[test]
    fn stock_url_space_size() {
        let (_, records) = stock_records();
        // 6 core + 5 services + 10 × (1 + 5) + 69 × (1 + 3) + 5 blog
        assert_eq!(records.len(), 352);
    }

    #[test]
    fn every_path_is_unique() {
        let (_, records) = stock_records();
        let unique: HashSet<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(unique.len(), records.len());
    }

    #[test]
    fn tier_policy_applied() {
        let (_, records) = stock_records();
        let expect = [
            ("/services/branding", 0.8, ChangeFrequency::Monthly),
            ("/locations/quebec", 0.7, ChangeFrequency::Monthly),
            ("/locations/quebec/branding", 0.6, ChangeFrequency::Monthly),
            ("/locations/quebec/laval", 0.6, ChangeFrequency::Monthly),
            ("/locations/quebec/laval/e-commerce", 0.5, ChangeFrequency::Monthly),
            ("/blog/app-development-cost-guide-canada", 0.7, ChangeFrequency::Yearly),
        ];
        for (path, priority, freq) in expect {
            let record = find_record(&records, path);
            assert_eq!(record.priority, priority, "{path}");
            assert_eq!(record.change_frequency, freq, "{path}");
        }
    }

    #[test]
    fn records_follow_province_then_city_order() {
        let records = url_set(
            &Catalog {
                services: vec![service("Branding", None)],
                provinces: vec![province("ontario", &["toronto", "ottawa"]), province("quebec", &["laval"])],
                blog_posts: Vec::new(),
            },
            &SiteConfig::stock(),
            fixed_now(),
        );
        let locations: Vec<&str> = records
            .iter()
            .map(|r| r.path.as_str())
            .filter(|p| p.starts_with("/locations/") && p.matches('/').count() <= 3)
            .collect();
        assert_eq!(
            locations,
            vec![
                "/locations/ontario",
                "/locations/ontario/branding",
                "/locations/ontario/toronto",
                "/locations/ontario/ottawa",
                "/locations/quebec",
                "/locations/quebec/branding",
                "/locations/quebec/laval",
            ]
        );
    }

    #[test]
    fn duplicate_service_slugs_emit_one_record() {
        let catalog = Catalog {
            services: vec![service("Web Design", None), service("Web", Some("Design"))],
            provinces: vec![province("ontario", &[])],
            blog_posts: Vec::new(),
        };
        let records = url_set(&catalog, &SiteConfig::stock(), fixed_now());
        assert_eq!(count_path(&records, "/services/web-design"), 1);
        assert_eq!(count_path(&records, "/locations/ontario/web-design"), 1);
    }

    #[test]
    fn city_named_like_service_keeps_service_record() {
        let catalog = Catalog {
            services: vec![service("Branding", None)],
            provinces: vec![province("ontario", &["branding"])],
            blog_posts: Vec::new(),
        };
        let records = url_set(&catalog, &SiteConfig::stock(), fixed_now());
        let record = find_record(&records, "/locations/ontario/branding");
        assert_eq!(record.tier, Tier::ProvinceService);
        assert_eq!(count_path(&records, "/locations/ontario/branding"), 1);
        // The city's own service pages are still distinct paths
        assert_eq!(count_path(&records, "/locations/ontario/branding/e-commerce"), 1);
    }

    #[test]
    fn configured_city_services_replace_fixed_keys() {
        let mut config = SiteConfig::stock();
        config.sitemap.city_services = vec!["seo".to_string()];
        let records = url_set(&ontario_catalog(), &config, fixed_now());
        assert_eq!(
            paths_in_tier(&records, Tier::CityService),
            vec!["/locations/ontario/toronto/seo"]
        );
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    #[test]
    fn every_loc_is_a_valid_absolute_url() {
        let (_, records) = stock_records();
        let origin = SiteConfig::stock().origin().to_string();
        for record in &records {
            let loc = absolute_url(&origin, &record.path);
            let parsed = url::Url::parse(&loc).unwrap_or_else(|e| panic!("{loc}: {e}"));
            assert_eq!(parsed.scheme(), "https");
            assert_eq!(parsed.host_str(), Some("www.venidevelopments.ca"));
            assert_eq!(parsed.path(), record.path);
            // Nothing needed escaping
            assert_eq!(parsed.as_str(), loc);
        }
    }

    #[test]
    fn absolute_url_handles_trailing_slash_origin() {
        assert_eq!(absolute_url("https://a.ca/", "/about"), "https://a.ca/about");
        assert_eq!(absolute_url("https://a.ca", "/"), "https://a.ca/");
    }

    #[test]
    fn sitemap_document_shape() {
        let records = url_set(&ontario_catalog(), &SiteConfig::stock(), fixed_now());
        let xml = render_sitemap(&records, "https://example.com");

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://example.com/locations/ontario/toronto/e-commerce</loc>"));
        assert!(xml.contains("<lastmod>2025-03-14T09:26:53.000Z</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.ends_with("</urlset>"));
        assert_eq!(xml.matches("<url>").count(), records.len());
    }

    #[test]
    fn sitemap_escapes_unsanitized_slugs() {
        let catalog = Catalog {
            services: vec![service("R&D <Lab>", None)],
            ..Catalog::default()
        };
        let records = url_set(&catalog, &SiteConfig::stock(), fixed_now());
        let xml = render_sitemap(&records, "https://example.com");
        assert!(xml.contains("<loc>https://example.com/services/randd-&lt;lab&gt;</loc>"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let catalog = Catalog::stock();
        let config = SiteConfig::stock();
        let a = render_sitemap(&url_set(&catalog, &config, fixed_now()), config.origin());
        let b = render_sitemap(&url_set(&catalog, &config, fixed_now()), config.origin());
        assert_eq!(a, b);
    }

    #[test]
    fn rendering_differs_only_in_lastmod() {
        let catalog = Catalog::stock();
        let config = SiteConfig::stock();
        let earlier = fixed_now();
        let later = earlier + Duration::days(3);

        let a = render_sitemap(&url_set(&catalog, &config, earlier), config.origin());
        let b = render_sitemap(&url_set(&catalog, &config, later), config.origin());
        assert_ne!(a, b);

        let a = a.replace(&format_lastmod(earlier), "LASTMOD");
        let b = b.replace(&format_lastmod(later), "LASTMOD");
        assert_eq!(a, b);
    }

    #[test]
    fn priority_formatting() {
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.5), "0.5");
        assert_eq!(format_priority(0.0), "0.0");
        assert_eq!(format_priority(0.85), "0.85");
    }

    #[test]
    fn tier_counts_skip_empty_tiers() {
        let records = url_set(&ontario_catalog(), &SiteConfig::stock(), fixed_now());
        let counts = tier_counts(&records);
        assert_eq!(counts[0], (Tier::Core, 6));
        assert!(counts.contains(&(Tier::CityService, 3)));
        assert!(!counts.iter().any(|(t, _)| *t == Tier::Blog));
    }
}
