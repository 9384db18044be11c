//! Static site generation.
//!
//! Writes everything a static host needs to serve the site without the
//! `serve` command: the sitemap, robots policy, a JSON manifest of the URL
//! set, and one landing page per URL record.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── sitemap.xml
//! ├── robots.txt
//! ├── urls.json                       # URL set manifest (origin, generated_at, urls)
//! ├── 404.html
//! ├── index.html                      # "/"
//! ├── services/
//! │   └── web-design/index.html
//! └── locations/
//!     └── ontario/
//!         ├── index.html
//!         └── toronto/
//!             ├── index.html
//!             └── e-commerce/index.html
//! ```
//!
//! Pages are rendered and written in parallel with
//! [rayon](https://docs.rs/rayon); every page is an independent file so no
//! coordination is needed beyond `create_dir_all`.

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::pages::{self, Site};
use crate::robots::RobotsPolicy;
use crate::sitemap::{render_sitemap, tier_counts, url_set};
use crate::types::{Tier, UrlRecord};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No page resolves for path '{0}'")]
    Unresolved(String),
}

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateSummary {
    pub output_dir: PathBuf,
    pub pages: usize,
    pub tiers: Vec<(Tier, usize)>,
}

/// Contents of `urls.json`.
#[derive(Debug, Serialize)]
struct UrlManifest<'a> {
    origin: &'a str,
    generated_at: DateTime<Utc>,
    urls: &'a [UrlRecord],
}

pub fn generate(
    config: &SiteConfig,
    catalog: &Catalog,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<GenerateSummary, GenerateError> {
    let records = url_set(catalog, config, now);
    let origin = config.origin();

    fs::create_dir_all(output_dir)?;

    fs::write(
        output_dir.join("sitemap.xml"),
        render_sitemap(&records, origin),
    )?;
    fs::write(
        output_dir.join("robots.txt"),
        RobotsPolicy::from_config(config).render(),
    )?;

    let manifest = UrlManifest {
        origin,
        generated_at: now,
        urls: &records,
    };
    fs::write(
        output_dir.join("urls.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    debug!(records = records.len(), "wrote sitemap.xml, robots.txt, urls.json");

    let site = Site { config, catalog };
    fs::write(
        output_dir.join("404.html"),
        pages::render_not_found(site).into_string(),
    )?;

    records
        .par_iter()
        .try_for_each(|record| write_page(site, output_dir, &record.path))?;

    info!(
        pages = records.len(),
        output = %output_dir.display(),
        "site generated"
    );

    Ok(GenerateSummary {
        output_dir: output_dir.to_path_buf(),
        pages: records.len(),
        tiers: tier_counts(&records),
    })
}

fn write_page(site: Site<'_>, output_dir: &Path, path: &str) -> Result<(), GenerateError> {
    let html = pages::render_path(site, path)
        .ok_or_else(|| GenerateError::Unresolved(path.to_string()))?;
    let file = page_file(output_dir, path)?;
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file, html)?;
    Ok(())
}

/// `/` → `index.html`, `/a/b` → `a/b/index.html`.
///
/// Paths that would escape the output directory (`..`, absolute segments)
/// are reported as unresolved.
fn page_file(output_dir: &Path, path: &str) -> Result<PathBuf, GenerateError> {
    let relative = Path::new(path.trim_start_matches('/'));
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(GenerateError::Unresolved(path.to_string()));
    }
    Ok(output_dir.join(relative).join("index.html"))
}

// ============================================================================
// Tests
// ============================================================================
