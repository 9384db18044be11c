//! SEO landing pages.
//!
//! Every path produced by [`crate::sitemap::url_set`] resolves to a [`Page`]
//! here, and every internal link on a rendered page is built from the same
//! catalog values and [`crate::naming::slugify`], so links and sitemap agree
//! by construction.
//!
//! ## Resolution
//!
//! [`resolve`] is the inverse of the generator and checks candidates in the
//! generator's order, so a path that was shadowed during enumeration resolves
//! to the record that won:
//!
//! ```text
//! core page path                       → Page::Core
//! /services/{slug}                     → Page::Service         (first matching service)
//! /locations/{province}                → Page::Province
//! /locations/{province}/{segment}      → Page::ProvinceService, else Page::City
//! /locations/{province}/{city}/{key}   → Page::CityService     (key from sitemap.city_services)
//! /blog/{post}                         → Page::BlogPost
//! ```
//!
//! The parts after `/services/` and `/locations/{province}/` are compared
//! whole against slugs and cities, never split on `/`.
//!
//! ## HTML Generation
//!
//! Pages are rendered with [maud](https://maud.lambda.xyz/); all interpolated
//! catalog text is escaped. Service details are markdown rendered with
//! pulldown-cmark.

use crate::catalog::{Catalog, Province, Service};
use crate::config::{CorePage, SiteConfig};
use crate::naming::display_title;
use crate::sitemap::absolute_url;
use crate::types::Tier;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

const CSS: &str = include_str!("../static/style.css");

/// Everything a page needs besides its own data.
#[derive(Clone, Copy)]
pub struct Site<'a> {
    pub config: &'a SiteConfig,
    pub catalog: &'a Catalog,
}

/// A resolved page, borrowing from the catalog and config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Page<'a> {
    Core(&'a CorePage),
    Service(&'a Service),
    Province(&'a Province),
    ProvinceService(&'a Province, &'a Service),
    City(&'a Province, &'a str),
    CityService {
        province: &'a Province,
        city: &'a str,
        key: &'a str,
    },
    BlogPost(&'a str),
}

impl Page<'_> {
    /// The URL tier this page belongs to.
    pub fn tier(&self) -> Tier {
        match self {
            Page::Core(_) => Tier::Core,
            Page::Service(_) => Tier::Service,
            Page::Province(_) => Tier::Province,
            Page::ProvinceService(..) => Tier::ProvinceService,
            Page::City(..) => Tier::City,
            Page::CityService { .. } => Tier::CityService,
            Page::BlogPost(_) => Tier::Blog,
        }
    }
}

/// Map a request path to a page. A single trailing `/` is tolerated.
pub fn resolve<'a>(site: Site<'a>, path: &str) -> Option<Page<'a>> {
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };

    if let Some(core) = site.config.sitemap.core_pages.iter().find(|p| p.path == path) {
        return Some(Page::Core(core));
    }

    if let Some(slug) = path.strip_prefix("/services/") {
        return site.catalog.find_service(slug).map(Page::Service);
    }
    if let Some(rest) = path.strip_prefix("/locations/") {
        return site
            .catalog
            .provinces
            .iter()
            .find_map(|province| resolve_in_province(site, province, rest));
    }
    if let Some(post) = path.strip_prefix("/blog/") {
        return site
            .catalog
            .blog_posts
            .iter()
            .find(|p| *p == post)
            .map(|p| Page::BlogPost(p.as_str()));
    }
    None
}

/// Match the part of a path after `/locations/` against one province.
///
/// Segments are matched as whole prefixes rather than split on `/`, so a
/// lenient catalog whose slugs contain `/` still resolves every generated
/// path.
fn resolve_in_province<'a>(site: Site<'a>, province: &'a Province, rest: &str) -> Option<Page<'a>> {
    if rest == province.code {
        return Some(Page::Province(province));
    }
    let rest = rest.strip_prefix(province.code.as_str())?.strip_prefix('/')?;

    if let Some(service) = site.catalog.find_service(rest) {
        return Some(Page::ProvinceService(province, service));
    }
    province.cities.iter().find_map(|city| {
        if rest == city {
            return Some(Page::City(province, city.as_str()));
        }
        let key = rest.strip_prefix(city.as_str())?.strip_prefix('/')?;
        site.config
            .sitemap
            .city_services
            .iter()
            .find(|k| *k == key)
            .map(|key| Page::CityService {
                province,
                city: city.as_str(),
                key: key.as_str(),
            })
    })
}

/// Resolve and render in one step. `None` means 404.
pub fn render_path(site: Site<'_>, path: &str) -> Option<String> {
    resolve(site, path).map(|page| render(site, &page).into_string())
}

// ============================================================================
// Page metadata
// ============================================================================

/// Display label for a city service key: the matching service's title if the
/// key is a service slug, otherwise the title-cased key.
fn service_key_title(catalog: &Catalog, key: &str) -> String {
    catalog
        .find_service(key)
        .map(Service::full_title)
        .unwrap_or_else(|| display_title(key))
}

fn service_description(service: &Service, brand: &str) -> String {
    if service.description.is_empty() {
        format!(
            "Expert {} services from {brand}, Canada's leading digital agency. \
             We create custom solutions for businesses across all provinces.",
            service.full_title()
        )
    } else {
        service.description.clone()
    }
}

/// `(title, meta description)` for a page.
fn page_meta(site: Site<'_>, page: &Page<'_>) -> (String, String) {
    let brand = &site.config.site.name;
    match *page {
        Page::Core(core) if core.path == "/" => (
            format!("{brand} | Custom App & Web Development Canada"),
            "Expert Canadian app (iOS, Android, Web) and web development services. \
             Let's build your next digital product."
                .to_string(),
        ),
        Page::Core(core) => (
            format!("{} | {brand}", core.title),
            format!("{} at {brand}, a Canadian digital agency.", core.title),
        ),
        Page::Service(service) => (
            format!("{} | {brand}", service.full_title()),
            service_description(service, brand),
        ),
        Page::Province(province) => (
            format!("Digital Solutions in {} | {brand}", province.display_name()),
            province.summary(brand),
        ),
        Page::ProvinceService(province, service) => (
            format!("{} in {} | {brand}", service.full_title(), province.display_name()),
            format!(
                "{} services for {} businesses.",
                service.full_title(),
                province.display_name()
            ),
        ),
        Page::City(province, city) => (
            format!(
                "Web & App Development in {}, {} | {brand}",
                display_title(city),
                province.display_name()
            ),
            format!(
                "Custom websites and applications for businesses in {}, {}.",
                display_title(city),
                province.display_name()
            ),
        ),
        Page::CityService {
            province,
            city,
            key,
        } => {
            let service = service_key_title(site.catalog, key);
            (
                format!("{service} in {} | {brand}", display_title(city)),
                format!(
                    "{service} for {} businesses across {}.",
                    display_title(city),
                    province.display_name()
                ),
            )
        }
        Page::BlogPost(post) => (
            format!("{} | {brand}", display_title(post)),
            format!("{} on the {brand} blog.", display_title(post)),
        ),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    description: &str,
    canonical: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en-CA" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta name="description" content=(description);
                link rel="canonical" href=(canonical);
                style { (PreEscaped(CSS)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with the core-page navigation
fn site_header(site: Site<'_>, current_path: &str) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (site.config.site.name) }
            nav.site-nav {
                ul {
                    @for page in site.config.sitemap.core_pages.iter().filter(|p| p.path != "/") {
                        @let is_current = current_path == page.path
                            || current_path.starts_with(&format!("{}/", page.path));
                        li class=[is_current.then_some("current")] {
                            a href=(page.path) { (page.title) }
                        }
                    }
                }
            }
        }
    }
}

fn site_footer(site: Site<'_>) -> Markup {
    html! {
        footer.site-footer {
            "Digital solutions for businesses across Canada · " (site.config.site.name)
        }
    }
}

fn breadcrumb(items: &[(String, String)]) -> Markup {
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            ol {
                li { a href="/" { "Home" } }
                @for (label, href) in items {
                    li { a href=(href) { (label) } }
                }
            }
        }
    }
}

/// Cards linking each service under `prefix` (e.g. `/services` or `/locations/ontario`).
fn service_cards(services: &[Service], prefix: &str) -> Markup {
    html! {
        div.card-grid {
            @for service in services {
                a.card href={ (prefix) "/" (service.slug()) } {
                    h3 { (service.full_title()) }
                    p { (service.description) }
                }
            }
        }
    }
}

fn link_list(items: impl IntoIterator<Item = (String, String)>) -> Markup {
    html! {
        ul.link-list {
            @for (label, href) in items {
                li { a href=(href) { (label) } }
            }
        }
    }
}

fn province_crumb(province: &Province) -> (String, String) {
    (
        province.display_name(),
        format!("/locations/{}", province.code),
    )
}

fn city_crumb(province: &Province, city: &str) -> (String, String) {
    (
        display_title(city),
        format!("/locations/{}/{}", province.code, city),
    )
}

// ============================================================================
// Page bodies
// ============================================================================

fn core_body(site: Site<'_>, core: &CorePage) -> Markup {
    let catalog = site.catalog;
    match core.path.as_str() {
        "/" => html! {
            h1 { (site.config.site.name) }
            p.lead { "Custom app and web development for Canadian businesses." }
            h2 { "Services" }
            (service_cards(&catalog.services, "/services"))
            h2 { "Locations" }
            (link_list(catalog.provinces.iter().map(|p| (p.display_name(), format!("/locations/{}", p.code)))))
        },
        "/services" => html! {
            h1 { (core.title) }
            (service_cards(&catalog.services, "/services"))
        },
        "/blog" => html! {
            h1 { (core.title) }
            (link_list(catalog.blog_posts.iter().map(|p| (display_title(p), format!("/blog/{p}")))))
        },
        _ => html! {
            h1 { (core.title) }
            p.lead { (site.config.site.name) " builds digital products for businesses across Canada." }
        },
    }
}

fn service_body(site: Site<'_>, service: &Service) -> Markup {
    let slug = service.slug();
    html! {
        (breadcrumb(&[("Services".to_string(), "/services".to_string())]))
        h1 { (service.full_title()) }
        p.lead { (service_description(service, &site.config.site.name)) }
        @if let Some(details) = &service.details {
            div.service-details { (PreEscaped(markdown_to_html(details))) }
        }
        h2 { (service.full_title()) " across Canada" }
        (link_list(site.catalog.provinces.iter().map(|p| {
            (p.display_name(), format!("/locations/{}/{slug}", p.code))
        })))
    }
}

fn province_body(site: Site<'_>, province: &Province) -> Markup {
    let name = province.display_name();
    let base = format!("/locations/{}", province.code);
    html! {
        (breadcrumb(&[]))
        h1 { "Digital Solutions in " (name) }
        p.lead { (province.summary(&site.config.site.name)) }
        h2 { "Our Services in " (name) }
        (service_cards(&site.catalog.services, &base))
        @if !province.cities.is_empty() {
            h2 { (name) " Service Areas" }
            (link_list(province.cities.iter().map(|c| (display_title(c), format!("{base}/{c}")))))
        }
    }
}

fn province_service_body(site: Site<'_>, province: &Province, service: &Service) -> Markup {
    let name = province.display_name();
    html! {
        (breadcrumb(&[province_crumb(province)]))
        h1 { (service.full_title()) " in " (name) }
        p.lead { (service_description(service, &site.config.site.name)) }
        @if let Some(details) = &service.details {
            div.service-details { (PreEscaped(markdown_to_html(details))) }
        }
        p { a href={ "/services/" (service.slug()) } { "More about " (service.full_title()) } }
        @if !province.cities.is_empty() {
            h2 { "Cities we serve in " (name) }
            (link_list(province.cities.iter().map(|c| {
                (display_title(c), format!("/locations/{}/{c}", province.code))
            })))
        }
    }
}

fn city_body(site: Site<'_>, province: &Province, city: &str) -> Markup {
    let city_name = display_title(city);
    let base = format!("/locations/{}/{city}", province.code);
    html! {
        (breadcrumb(&[province_crumb(province)]))
        h1 { "Digital Solutions in " (city_name) ", " (province.display_name()) }
        p.lead {
            (site.config.site.name) " helps " (city_name)
            " businesses build websites and applications that grow with them."
        }
        h2 { "Services in " (city_name) }
        (link_list(site.config.sitemap.city_services.iter().map(|key| {
            (service_key_title(site.catalog, key), format!("{base}/{key}"))
        })))
    }
}

fn city_service_body(site: Site<'_>, province: &Province, city: &str, key: &str) -> Markup {
    let city_name = display_title(city);
    let service = service_key_title(site.catalog, key);
    let base = format!("/locations/{}/{city}", province.code);
    html! {
        (breadcrumb(&[province_crumb(province), city_crumb(province, city)]))
        h1 { (service) " in " (city_name) }
        p.lead {
            (service) " for " (city_name) " businesses, delivered by " (site.config.site.name) "."
        }
        h2 { "Other services in " (city_name) }
        (link_list(site.config.sitemap.city_services.iter().filter(|k| *k != key).map(|k| {
            (service_key_title(site.catalog, k), format!("{base}/{k}"))
        })))
    }
}

fn blog_post_body(post: &str) -> Markup {
    html! {
        (breadcrumb(&[("Blog".to_string(), "/blog".to_string())]))
        h1 { (display_title(post)) }
    }
}

/// Renders a full HTML document for a resolved page.
pub fn render(site: Site<'_>, page: &Page<'_>) -> Markup {
    let (title, description) = page_meta(site, page);
    let (path, body_class, body) = match *page {
        Page::Core(core) => (core.path.clone(), "core-page", core_body(site, core)),
        Page::Service(service) => (
            format!("/services/{}", service.slug()),
            "service-page",
            service_body(site, service),
        ),
        Page::Province(province) => (
            format!("/locations/{}", province.code),
            "province-page",
            province_body(site, province),
        ),
        Page::ProvinceService(province, service) => (
            format!("/locations/{}/{}", province.code, service.slug()),
            "province-service-page",
            province_service_body(site, province, service),
        ),
        Page::City(province, city) => (
            format!("/locations/{}/{city}", province.code),
            "city-page",
            city_body(site, province, city),
        ),
        Page::CityService {
            province,
            city,
            key,
        } => (
            format!("/locations/{}/{city}/{key}", province.code),
            "city-service-page",
            city_service_body(site, province, city, key),
        ),
        Page::BlogPost(post) => (format!("/blog/{post}"), "blog-page", blog_post_body(post)),
    };

    let canonical = absolute_url(site.config.origin(), &path);
    let content = html! {
        (site_header(site, &path))
        main { (body) }
        (site_footer(site))
    };
    base_document(&title, &description, &canonical, Some(body_class), content)
}

/// Renders the 404 page.
pub fn render_not_found(site: Site<'_>) -> Markup {
    let content = html! {
        (site_header(site, ""))
        main {
            h1 { "Page not found" }
            p.lead { "The page you are looking for does not exist." }
            p { a href="/" { "Back to home" } }
        }
        (site_footer(site))
    };
    base_document(
        &format!("Page not found | {}", site.config.site.name),
        "Page not found",
        &absolute_url(site.config.origin(), "/"),
        Some("not-found-page"),
        content,
    )
}
