//! Shared test utilities for the veni-seo test suite.
//!
//! Provides small catalog builders, a fixed clock, and lookups over generated
//! URL records that panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = ontario_catalog();
//! let records = url_set(&catalog, &SiteConfig::stock(), fixed_now());
//!
//! let record = find_record(&records, "/locations/ontario/toronto");
//! assert_eq!(record.tier, Tier::City);
//! ```

use chrono::{DateTime, TimeZone, Utc};

use crate::catalog::{Catalog, Province, Service};
use crate::types::{Tier, UrlRecord};

// =========================================================================
// Catalog builders
// =========================================================================

pub fn service(title: &str, subtitle: Option<&str>) -> Service {
    Service {
        title: title.to_string(),
        subtitle: subtitle.map(String::from),
        description: format!("{title} services"),
        details: None,
    }
}

pub fn province(code: &str, cities: &[&str]) -> Province {
    Province {
        code: code.to_string(),
        name: None,
        description: None,
        cities: cities.iter().map(|c| c.to_string()).collect(),
    }
}

/// One province, one city, one service, no blog posts.
pub fn ontario_catalog() -> Catalog {
    Catalog {
        services: vec![service("Web Design", None)],
        provinces: vec![province("ontario", &["toronto"])],
        blog_posts: Vec::new(),
    }
}

/// A fixed timestamp so generated output is comparable byte for byte.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
}

// =========================================================================
// Record lookups — panics with a clear message on miss
// =========================================================================

/// Find a record by path. Panics if not found.
pub fn find_record<'a>(records: &'a [UrlRecord], path: &str) -> &'a UrlRecord {
    records.iter().find(|r| r.path == path).unwrap_or_else(|| {
        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        panic!("record '{path}' not found. Available: {paths:?}")
    })
}

/// Count records with exactly this path.
pub fn count_path(records: &[UrlRecord], path: &str) -> usize {
    records.iter().filter(|r| r.path == path).count()
}

/// Paths of every record in `tier`, in output order.
pub fn paths_in_tier(records: &[UrlRecord], tier: Tier) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.tier == tier)
        .map(|r| r.path.as_str())
        .collect()
}
