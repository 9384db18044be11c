//! `robots.txt` policy.
//!
//! One rule group (user agent, allow and disallow lines) followed by the
//! declared host and the sitemap location, both derived from the site origin.

use crate::config::SiteConfig;
use crate::sitemap::absolute_url;

#[derive(Debug, Clone, PartialEq)]
pub struct RobotsPolicy {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
    pub host: String,
    pub sitemap: String,
}

impl RobotsPolicy {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            user_agent: config.robots.user_agent.clone(),
            allow: config.robots.allow.clone(),
            disallow: config.robots.disallow.clone(),
            host: config.origin().to_string(),
            sitemap: absolute_url(config.origin(), "/sitemap.xml"),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("User-Agent: {}\n", self.user_agent);
        for path in &self.allow {
            out.push_str(&format!("Allow: {path}\n"));
        }
        for path in &self.disallow {
            out.push_str(&format!("Disallow: {path}\n"));
        }
        out.push('\n');
        out.push_str(&format!("Host: {}\n", self.host));
        out.push_str(&format!("Sitemap: {}\n", self.sitemap));
        out
    }
}
