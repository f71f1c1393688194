//! paygate - serve static sites with paywalled pages
//!
//! Builds the page catalog from a generated site and renders pages for a given viewer.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use paywall::{PaywallCatalog, SharedFragments, ViewerState};
use site::{ConfigCatalog, DiskReader, DiskSource, SiteSource, format_price_minor};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod settings;

use crate::settings::Settings;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const DEFAULT_SETTINGS: &str = "paygate.toml";

/// paygate - paywalled static pages
#[derive(Parser, Debug)]
#[command(name = "paygate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the settings file (default: paygate.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site directory, overriding the settings file
    #[arg(long)]
    site: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the catalog and report page counts
    Check,

    /// List catalog pages, with prices for gated ones
    #[command(alias = "ls")]
    List,

    /// Render the page serving a route to stdout
    Render {
        /// Request route, e.g. `/posts/intro`
        route: String,

        /// Viewer display name
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        logged_in: bool,

        #[arg(long)]
        has_paid: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(site) = cli.site {
        settings.site.root = site;
    }

    let catalog = build_catalog(&settings)?;

    match cli.command {
        Commands::Check => {
            println!("{} pages, {} gated", catalog.len(), catalog.gated_count());
        }
        Commands::List => {
            for (path, unit) in catalog.iter() {
                match unit.article() {
                    Some(article) if unit.is_gated() => println!(
                        "{path}\t{} {}\t{}",
                        format_price_minor(article.price_minor),
                        article.currency,
                        article.name
                    ),
                    _ => println!("{path}"),
                }
            }
        }
        Commands::Render {
            route,
            name,
            logged_in,
            has_paid,
        } => {
            let key = catalog
                .resolve(&route)
                .ok_or_else(|| anyhow!("no page serves route `{route}`"))?;
            let viewer = ViewerState::new(name, logged_in, has_paid);
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            catalog
                .render_to_sink(key, &viewer, &mut out)
                .with_context(|| format!("failed to render {key}"))?;
            out.flush().context("failed to write to stdout")?;
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None if Path::new(DEFAULT_SETTINGS).exists() => {
            Settings::from_file(Path::new(DEFAULT_SETTINGS))
                .with_context(|| format!("failed to load settings from {DEFAULT_SETTINGS}"))
        }
        None => Ok(Settings::default()),
    }
}

fn build_catalog(settings: &Settings) -> Result<PaywallCatalog> {
    let source = DiskSource::new(&settings.site.root, &settings.site.suffix);
    let pages = source
        .load()
        .with_context(|| format!("failed to load pages from {}", source.describe()))?;

    let config = match &settings.site.manifest {
        Some(path) => ConfigCatalog::from_file(path)
            .with_context(|| format!("failed to load manifest {}", path.display()))?,
        None => ConfigCatalog::empty(),
    };

    let fragments = SharedFragments::from_dir(
        &DiskReader,
        &settings.fragments.dir,
        &settings.fragments.names(),
    )
    .with_context(|| {
        format!(
            "failed to load shared fragments from {}",
            settings.fragments.dir.display()
        )
    })?;

    let mut catalog =
        PaywallCatalog::build(&pages, &config, &fragments, &settings.compiler.to_settings())
            .context("failed to build the page catalog")?;
    let prefix = settings.strip_prefix();
    let rewritten = catalog.strip_prefix(&prefix);
    tracing::debug!(prefix = %prefix, rewritten, "catalog keys rewritten");

    Ok(catalog)
}
