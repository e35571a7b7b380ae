#![forbid(unsafe_code)]

//! Vitrine storefront demo.
//!
//! Renders the bundled eight-item catalog once per registered locale (or
//! for a single locale) and prints the resulting view models.
//!
//! # Running
//!
//! ```sh
//! cargo run -p vitrine-demo
//! cargo run -p vitrine-demo -- --locale tr --sort category
//! RUST_LOG=vitrine_i18n=debug cargo run -p vitrine-demo -- --search lamp
//! ```
//!
//! View knobs come from the `VITRINE_*` environment variables read by
//! [`ViewConfig::from_env`].

mod data;

use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use vitrine::{
    CatalogView, Locale, LocaleRegistry, Query, QueryCache, Result, SortKey, TranslationResolver,
    ViewConfig, ViewRenderer,
};

/// Command-line flags.
#[derive(Debug)]
struct Args {
    locale: Option<String>,
    search: String,
    sort: SortKey,
}

impl Args {
    fn parse() -> Result<Self> {
        let flag = |name: &str| std::env::args().skip_while(|a| a != name).nth(1);
        Ok(Self {
            locale: flag("--locale"),
            search: flag("--search").unwrap_or_default(),
            sort: flag("--sort").map(|s| s.parse::<SortKey>()).transpose()?.unwrap_or_default(),
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse()?;
    let config = ViewConfig::from_env()?;
    let registry = LocaleRegistry::builtin();
    let table = data::translations()?;
    let catalog = data::catalog()?;
    info!(items = catalog.len(), locales = registry.len(), "fixture loaded");

    let mut cache = QueryCache::new(config.cache_capacity);
    let renderer = ViewRenderer::new(&registry, &table, config);
    let resolver = TranslationResolver::new(&registry, &table);

    let locales: Vec<&Locale> = match &args.locale {
        Some(code) => vec![registry.get(code)?],
        None => registry.iter().collect(),
    };

    for locale in locales {
        let query = Query::new(locale.code())
            .search(args.search.as_str())
            .sort(args.sort);
        let view = renderer.render_cached(&catalog, &query, &mut cache)?;
        print_view(locale, &view, resolver)?;
    }

    let stats = cache.stats();
    debug!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = stats.hit_rate(),
        "query cache"
    );
    Ok(())
}

fn print_view(locale: &Locale, view: &CatalogView, resolver: TranslationResolver<'_>) -> Result<()> {
    let label = |key: &str| resolver.lookup(key, locale.code()).map(|r| r.text);

    println!(
        "== {} ({}, {}) ==",
        locale.display_name(),
        view.locale,
        view.direction
    );
    println!("{}: {}", label("productCatalog")?, view.count_text);

    let category = label("category")?;
    let ships_from = label("shipsFrom")?;
    let description = label("description")?;
    for item in &view.items {
        println!();
        println!(
            "  {}  {}  [{}]",
            item.formatted_name, item.formatted_price, item.recommended_label
        );
        println!("    {category}: {}", item.formatted_category);
        println!("    {ships_from}: {}", item.formatted_address);
        println!("    {description}: {}", item.formatted_description);
    }
    println!();
    Ok(())
}
