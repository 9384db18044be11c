//! HTTP surface.
//!
//! Serves the sitemap and robots policy computed fresh from the shared
//! tables on every request, the landing pages, and the configured legacy
//! redirects. Every response carries the security headers.
//!
//! ```text
//! GET /sitemap.xml, /api/sitemap.xml  → sitemap XML (Cache-Control from config)
//! GET /robots.txt                     → robots policy
//! GET <redirect source>               → 308 / 307 to destination
//! GET <page path>                     → landing page, else 404 page
//! ```
//!
//! State is immutable and shared through an `Arc`; handlers never lock.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri, header};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use chrono::Utc;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::pages::{self, Site};
use crate::robots::RobotsPolicy;
use crate::sitemap::{render_sitemap, url_set};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bind address \"{0}\"")]
    InvalidAddr(String),
}

const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_XSS_PROTECTION, "1; mode=block"),
];

/// Immutable tables shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: SiteConfig,
    pub catalog: Catalog,
}

impl AppState {
    fn site(&self) -> Site<'_> {
        Site {
            config: &self.config,
            catalog: &self.catalog,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(sitemap))
        .route("/api/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .fallback(fallback)
        .layer(middleware::map_response(security_headers))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn sitemap(State(state): State<Arc<AppState>>) -> Response {
    let records = url_set(&state.catalog, &state.config, Utc::now());
    let body = render_sitemap(&records, state.config.origin());
    (
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (header::CACHE_CONTROL, state.config.sitemap.cache_control.clone()),
        ],
        body,
    )
        .into_response()
}

async fn robots(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        RobotsPolicy::from_config(&state.config).render(),
    )
        .into_response()
}

async fn fallback(State(state): State<Arc<AppState>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    // Catalog slugs may carry non-ASCII characters; match on the decoded path.
    let Ok(decoded) = percent_decode_str(uri.path()).decode_utf8() else {
        return not_found(&state);
    };
    let path = decoded.as_ref();
    let source = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };
    if let Some(redirect) = state.config.redirects.iter().find(|r| r.source == source) {
        return if redirect.permanent {
            Redirect::permanent(&redirect.destination).into_response()
        } else {
            Redirect::temporary(&redirect.destination).into_response()
        };
    }

    match pages::render_path(state.site(), path) {
        Some(html) => Html(html).into_response(),
        None => not_found(&state),
    }
}

fn not_found(state: &AppState) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found(state.site()).into_string()),
    )
        .into_response()
}

async fn security_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();
    let response = next.run(request).await;
    debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}

// ============================================================================
// Serving
// ============================================================================

/// Parses `host` (an IP literal or `localhost`) and `port` into a socket address.
pub fn parse_bind_addr(host: &str, port: u16) -> Result<SocketAddr, ServeError> {
    let ip = if host == "localhost" {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_err(|_| ServeError::InvalidAddr(format!("{host}:{port}")))?
    };
    Ok(SocketAddr::new(ip, port))
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState) -> Result<(), ServeError> {
    let addr = parse_bind_addr(&state.config.server.host, state.config.server.port)?;
    let listener = TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let app = router(Arc::new(state));
    info!(%bound_addr, "serving");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    debug!("server shut down");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
