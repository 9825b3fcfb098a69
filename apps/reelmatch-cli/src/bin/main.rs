use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use reelmatch_core::config::{CatalogConfig, Config, ImagesConfig};
use reelmatch_core::types::{parse_search_response, MatchResult, MediaType, Recommendations, TitleQuery};
use reelmatch_core::{Catalog, CatalogFilter};
use reelmatch_resolver::{CandidateResolver, ResolverPolicy};
use reelmatch_similarity::{RecommendSettings, SimilarityIndex};

const USAGE: &str = "Usage: reelmatch <recommend|resolve|genres|browse> [args...]
  recommend <title> [k] [--genre G]... [--years A-B] [--type movie|tv]
  resolve <title> <movie|tv> [year] <response.json>
  genres [n]
  browse [--genre G]... [--years A-B] [--type movie|tv]";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

/// Splits `--genre/--years/--type` options from positional arguments.
fn parse_filter(args: &[String]) -> anyhow::Result<(CatalogFilter, Vec<String>)> {
    let mut filter = CatalogFilter::default();
    let mut positional = Vec::new();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--genre" => filter.genres.push(it.next().context("--genre needs a value")?.clone()),
            "--years" => {
                let range = it.next().context("--years needs a value like 2000-2020")?;
                let (from, to) = range.split_once('-').context("--years expects A-B")?;
                filter.years = Some((from.trim().parse()?, to.trim().parse()?));
            }
            "--type" => {
                let t = it.next().context("--type needs movie or tv")?;
                filter.media_type = Some(t.parse::<MediaType>().map_err(anyhow::Error::msg)?);
            }
            _ => positional.push(arg.clone()),
        }
    }
    Ok((filter, positional))
}

fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let catalog_cfg: CatalogConfig = config.section("catalog")?;
    let path = config.resolve_path(&catalog_cfg.path);
    Catalog::load(&path).with_context(|| format!("loading catalog from {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "recommend" => {
            let (filter, positional) = parse_filter(&args)?;
            let Some(title) = positional.first() else { bail!("Usage: reelmatch recommend \"<title>\" [k]") };
            let settings: RecommendSettings = config.section("recommend")?;
            let k = match positional.get(1) { Some(k) => k.parse().context("k must be a number")?, None => settings.top_k };
            let index = SimilarityIndex::build_with(load_catalog(&config)?, settings.matrix)?;
            let recs = index.recommend(title, k);
            tracing::info!(title = %title, k, found = !recs.is_not_found(), filtered = !filter.is_empty(), "recommendation query");
            let recs = if filter.is_empty() { recs } else { recs.filtered(index.catalog(), &filter) };
            match recs {
                Recommendations::TitleNotFound => println!("Title not found: \"{title}\". Try another."),
                Recommendations::Ranked(items) if items.is_empty() => println!("No recommendations match your filters."),
                Recommendations::Ranked(items) => {
                    for (i, r) in items.iter().enumerate() { println!("  {}. {}  (score={:.4})", i + 1, r.title, r.score); }
                }
            }
        }
        "resolve" => {
            let [title, media_type, rest @ ..] = args.as_slice() else { bail!("Usage: reelmatch resolve <title> <movie|tv> [year] <response.json>") };
            let media_type: MediaType = media_type.parse().map_err(anyhow::Error::msg)?;
            let (year, response_path) = match rest {
                [path] => (None, path),
                [year, path] => (Some(year.parse::<i32>().context("year must be a number")?), path),
                _ => bail!("Usage: reelmatch resolve <title> <movie|tv> [year] <response.json>"),
            };
            let raw = std::fs::read_to_string(PathBuf::from(response_path)).with_context(|| format!("reading {response_path}"))?;
            let response: serde_json::Value = serde_json::from_str(&raw)?;
            let candidates = parse_search_response(&response, media_type);
            let policy: ResolverPolicy = config.section("resolver")?;
            let resolver = CandidateResolver::new(policy)?;
            let images: ImagesConfig = config.section("images")?;
            let result = resolver.resolve(&TitleQuery::new(title.clone(), year, media_type), &candidates);
            tracing::info!(title = %title, candidates = candidates.len(), found = result.is_found(), "poster lookup");
            match result {
                MatchResult::Found(path) => println!("{}", images.url_for(&path)),
                MatchResult::NotFound => println!("No poster found for \"{title}\""),
            }
        }
        "genres" => {
            let n = args.first().map(|n| n.parse()).transpose().context("n must be a number")?.unwrap_or(10);
            let catalog = load_catalog(&config)?;
            for (genre, count) in catalog.top_genres(n) { println!("  {count:>6}  {genre}"); }
        }
        "browse" => {
            let (filter, _) = parse_filter(&args)?;
            let catalog = load_catalog(&config)?;
            let rows = catalog.browse(&filter);
            for item in rows.iter().filter_map(|&row| catalog.get(row)) {
                let year = item.release_year.map_or_else(|| "N/A".to_string(), |y| y.to_string());
                println!("  {}  ({} • {})", item.title, year, item.media_type);
            }
            println!("{} titles", rows.len());
        }
        _ => { eprintln!("Unknown command: {}\n{USAGE}", cmd); std::process::exit(1); }
    }
    Ok(())
}
