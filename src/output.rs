//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not URL-centric**. Catalog entities lead
//! with their positional index and display title; the derived slug or code is
//! shown as an indented context line, so the output reads as a content
//! inventory while still showing exactly which path segment each entity
//! produces.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Services
//! 001 Web Design
//!     Slug: web-design
//!     Beautiful, responsive websites that look great on any de...
//!
//! Provinces
//! 001 Ontario (10 cities)
//!     Code: ontario
//!
//! Blog
//! 001 App Development Cost Guide Canada
//!     Path: /blog/app-development-cost-guide-canada
//!
//! URLs
//!     core                              6
//!     service                           5
//!     ...
//!     total                           352
//! ```
//!
//! When two services derive the same slug (lenient mode only), a `Shadowed`
//! section lists the slugs whose later services are unreachable.
//!
//! ## Urls
//!
//! ```text
//! 1.0   weekly   /
//! 0.8   monthly  /services/web-design
//! ```
//!
//! ## Build
//!
//! ```text
//! sitemap.xml, robots.txt, urls.json, 404.html
//!     core                              6 pages
//!     ...
//! Generated 352 pages → dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::generate::GenerateSummary;
use crate::naming::display_title;
use crate::sitemap::{format_priority, tier_counts};
use crate::types::UrlRecord;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format an entity header: positional index + title, with optional city count.
///
/// ```text
/// 001 Ontario (10 cities)
/// 001 Web Design
/// ```
fn entity_header(index: usize, title: &str, cities: Option<usize>) -> String {
    match cities {
        Some(1) => format!("{} {} (1 city)", format_index(index), title),
        Some(n) => format!("{} {} ({} cities)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn tier_line(tier: &str, count: usize, suffix: &str) -> String {
    format!("    {:<28}{:>6}{}", tier, count, suffix)
}

// ============================================================================
// check
// ============================================================================

/// Format the catalog inventory plus per-tier URL counts.
pub fn format_check_output(catalog: &Catalog, records: &[UrlRecord]) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Services".to_string());
    for (i, service) in catalog.services.iter().enumerate() {
        lines.push(entity_header(i + 1, &service.full_title(), None));
        lines.push(format!("    Slug: {}", service.slug()));
        let desc = truncate_desc(service.description.trim(), 60);
        if !desc.is_empty() {
            lines.push(format!("    {}", desc));
        }
    }

    lines.push(String::new());
    lines.push("Provinces".to_string());
    for (i, province) in catalog.provinces.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            &province.display_name(),
            Some(province.cities.len()),
        ));
        lines.push(format!("    Code: {}", province.code));
    }

    if !catalog.blog_posts.is_empty() {
        lines.push(String::new());
        lines.push("Blog".to_string());
        for (i, post) in catalog.blog_posts.iter().enumerate() {
            lines.push(entity_header(i + 1, &display_title(post), None));
            lines.push(format!("    Path: /blog/{}", post));
        }
    }

    let shadowed = catalog.duplicate_slugs();
    if !shadowed.is_empty() {
        lines.push(String::new());
        lines.push("Shadowed".to_string());
        for slug in shadowed {
            lines.push(format!("    {} (first service wins)", slug));
        }
    }

    lines.push(String::new());
    lines.extend(format_url_counts(records));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(catalog: &Catalog, records: &[UrlRecord]) {
    for line in format_check_output(catalog, records) {
        println!("{}", line);
    }
}

// ============================================================================
// URL counts and listing
// ============================================================================

/// Per-tier record counts with a total line. Empty tiers are omitted.
pub fn format_url_counts(records: &[UrlRecord]) -> Vec<String> {
    let mut lines = vec!["URLs".to_string()];
    for (tier, count) in tier_counts(records) {
        lines.push(tier_line(tier.label(), count, ""));
    }
    lines.push(tier_line("total", records.len(), ""));
    lines
}

/// One line per record: priority, change frequency, path.
pub fn format_url_list(records: &[UrlRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            format!(
                "{:<5} {:<8} {}",
                format_priority(r.priority),
                r.change_frequency.as_str(),
                r.path
            )
        })
        .collect()
}

/// Print the URL listing to stdout.
pub fn print_url_list(records: &[UrlRecord]) {
    for line in format_url_list(records) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the result of writing the static output directory.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = vec!["sitemap.xml, robots.txt, urls.json, 404.html".to_string()];
    for (tier, count) in &summary.tiers {
        let suffix = if *count == 1 { " page" } else { " pages" };
        lines.push(tier_line(tier.label(), *count, suffix));
    }
    lines.push(format!(
        "Generated {} pages → {}",
        summary.pages,
        summary.output_dir.display()
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
