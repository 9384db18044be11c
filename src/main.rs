use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use veni_seo::catalog::{self, Catalog};
use veni_seo::config::{self, SITE_URL_ENV, SiteConfig};
use veni_seo::logging::{self, LogFormat};
use veni_seo::robots::RobotsPolicy;
use veni_seo::server::{self, AppState};
use veni_seo::{generate, output, sitemap};

#[derive(Parser)]
#[command(name = "veni-seo")]
#[command(about = "Sitemap, robots policy and landing pages for the Veni Developments site")]
#[command(long_about = "\
Sitemap, robots policy and landing pages for the Veni Developments site

The URL space is derived from a content catalog: services, provinces and
the cities inside them. Every combination gets a landing page and a sitemap
entry with a priority that depends on its tier.

Source directory:

  content/
  ├── config.toml     # Site origin, priorities, robots rules, redirects (optional)
  └── catalog.toml    # Services, provinces, cities, blog posts (optional)

Both files merge over the built-in defaults. The SITE_URL environment
variable overrides the configured origin.

URL tiers:
  /                                        core pages (hand-listed)
  /services/{service}                      one per service
  /locations/{province}                    one per province
  /locations/{province}/{service}          province × service
  /locations/{province}/{city}             province × city
  /locations/{province}/{city}/{key}       province × city × fixed service key
  /blog/{post}                             one per blog post

Run 'veni-seo gen-config' or 'veni-seo gen-catalog' to print documented defaults.")]
#[command(version)]
struct Cli {
    /// Content directory holding config.toml and catalog.toml
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for `build`
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate config and catalog, then print the inventory and URL counts
    Check,
    /// List every generated URL
    Urls {
        /// Print the URL records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print sitemap.xml to stdout
    Sitemap,
    /// Print robots.txt to stdout
    Robots,
    /// Write sitemap, robots policy and landing pages to the output directory
    Build,
    /// Serve sitemap, robots policy and landing pages over HTTP
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the stock catalog.toml
    GenCatalog,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format, cli.verbose);

    match cli.command {
        Command::Check => {
            let (config, catalog) = load(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let records = sitemap::url_set(&catalog, &config, Utc::now());
            output::print_check_output(&catalog, &records);
            println!("==> Content is valid");
        }
        Command::Urls { json } => {
            let (config, catalog) = load(&cli.source)?;
            let records = sitemap::url_set(&catalog, &config, Utc::now());
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                output::print_url_list(&records);
            }
        }
        Command::Sitemap => {
            let (config, catalog) = load(&cli.source)?;
            let records = sitemap::url_set(&catalog, &config, Utc::now());
            println!("{}", sitemap::render_sitemap(&records, config.origin()));
        }
        Command::Robots => {
            let (config, _) = load(&cli.source)?;
            print!("{}", RobotsPolicy::from_config(&config).render());
        }
        Command::Build => {
            let (config, catalog) = load(&cli.source)?;
            println!("==> Generating site → {}", cli.output.display());
            let summary = generate::generate(&config, &catalog, &cli.output, Utc::now())?;
            output::print_generate_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Serve { host, port } => {
            let (mut config, catalog) = load(&cli.source)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(AppState { config, catalog }))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenCatalog => {
            print!("{}", catalog::stock_catalog_toml());
        }
    }

    Ok(())
}

/// Load config (with the SITE_URL override) and the catalog it governs.
fn load(source: &std::path::Path) -> Result<(SiteConfig, Catalog), Box<dyn std::error::Error>> {
    let site_url = std::env::var(SITE_URL_ENV).ok();
    let config = config::load_config(source, site_url.as_deref())?;
    let catalog = catalog::load_catalog(source, config.slugs.strict)?;
    Ok((config, catalog))
}
