//! Centralized slug derivation for every URL segment the site exposes.
//!
//! Services have no stored identity: their slug is derived from the display
//! title (plus optional subtitle) every time it is needed. The generator, the
//! page resolver and every in-page link call [`slugify`], so the three can
//! never drift apart.
//!
//! ## Slug Rule
//!
//! - title and subtitle joined with a single space (subtitle only if present)
//! - lowercased
//! - each run of whitespace replaced by one `-`
//! - each `&` replaced by `and`
//!
//! Nothing else is touched. Punctuation and accented letters pass through
//! unchanged, which is why [`is_url_safe`] exists for strict catalogs.
//!
//! ## Display Titles
//!
//! The reverse direction is lossy and only used for presentation:
//! - `british-columbia` → "British Columbia"
//! - `e-commerce` → "E Commerce"

/// Derive the URL slug for a title with an optional subtitle.
///
/// An empty subtitle counts as absent:
/// - `("Web Design", None)` → `"web-design"`
/// - `("Web", Some("Development"))` → `"web-development"`
/// - `("App Development", Some("Mobile & Web Apps"))` → `"app-development-mobile-and-web-apps"`
pub fn slugify(title: &str, subtitle: Option<&str>) -> String {
    let full = match subtitle {
        Some(sub) if !sub.is_empty() => format!("{title} {sub}"),
        _ => title.to_string(),
    };
    let lowered = full.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            slug.push(c);
        }
    }
    slug.replace('&', "and")
}

/// Title-case a slug for display: split on `-`, capitalize each word.
pub fn display_title(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if `segment` can appear in a URL path without escaping.
///
/// Allows the RFC 3986 unreserved set minus uppercase letters, since every
/// generated segment is lowercase.
pub fn is_url_safe(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_' | '~'))
}
