//! # veni-seo
//!
//! Search-engine surface for the Veni Developments agency site: the sitemap,
//! the robots policy, and one landing page for every location and service
//! combination the agency targets.
//!
//! # Architecture: Catalog → URL Set → Outputs
//!
//! Everything is derived from two immutable values loaded at startup:
//!
//! ```text
//! content/config.toml  ─┐
//!                       ├─▶ SiteConfig ─┐
//! content/catalog.toml ─┴─▶ Catalog ────┴─▶ url_set() ─▶ sitemap.xml
//!                                                     ├─▶ robots.txt
//!                                                     ├─▶ landing pages
//!                                                     └─▶ urls.json
//! ```
//!
//! The URL set is recomputed on every request or build; nothing is cached
//! or persisted, so a catalog edit shows up in the next sitemap.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Services, provinces, cities, blog posts: stock data, loading, validation, lookup |
//! | [`config`] | `config.toml` loading, stock defaults, deep merge, `SITE_URL` override, validation |
//! | [`naming`] | Slug derivation shared by the generator, the pages, and the catalog checks |
//! | [`types`] | Shared value types (`UrlRecord`, `Tier`, `ChangeFrequency`) |
//! | [`sitemap`] | URL-space generator and sitemap XML rendering using Maud |
//! | [`robots`] | Robots policy and `robots.txt` rendering |
//! | [`pages`] | Path → page resolution and landing-page HTML using Maud |
//! | [`generate`] | Writes the static output directory |
//! | [`server`] | axum HTTP surface: sitemap, robots, pages, redirects, security headers |
//! | [`output`] | CLI output formatting: catalog inventory and URL counts |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Slugs Are Derived, Never Stored
//!
//! A service's path segment is always [`naming::slugify`] of its title and
//! subtitle. The generator, the page resolver, and every internal link call
//! the same function, so a link can never disagree with the sitemap.
//!
//! ## Strict Slugs by Default
//!
//! Two services deriving the same slug would make the second unreachable,
//! and a slug with a `/` or `?` in it would silently change the URL
//! structure. With `[slugs] strict = true` (the default) both are load
//! errors. Turning strict mode off restores first-match-wins lookup and
//! passes characters through unchanged; the generator still drops repeated
//! paths so every `<loc>` stays unique.
//!
//! ## Explicit Inputs, No Globals
//!
//! The catalog and config are plain values handed to every function that
//! needs them. The `SITE_URL` environment variable is read once in `main`
//! and passed into [`config::load_config`], which keeps tests free of
//! environment races.
//!
//! ## Maud for XML and HTML
//!
//! Both the sitemap and the landing pages are generated with
//! [Maud](https://maud.lambda.xyz/). Interpolation is escaped by default, so
//! an ampersand in a catalog title cannot produce an invalid sitemap or an
//! injected tag.

pub mod catalog;
pub mod config;
pub mod generate;
pub mod logging;
pub mod naming;
pub mod output;
pub mod pages;
pub mod robots;
pub mod server;
pub mod sitemap;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
