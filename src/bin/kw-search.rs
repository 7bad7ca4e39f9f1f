use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kwsearch::{
    Background, CancelToken, DiskIndex, IdfTable, IndexSource, KeywordIndex, LabelCatalog,
    QueryResolver, SuggestionEngine,
};

#[derive(Parser, Debug)]
#[command(
    name = "kw-search",
    about = "Query a keyword posting-list index, or suggest matching labels"
)]
struct Args {
    /// Path to the `~`-delimited label dictionary
    labels: std::path::PathBuf,
    /// Query text (`a+b*c`), or the typed prefix with --suggest
    query: String,
    /// Path to the binary posting-list index (.index)
    #[arg(long)]
    index: Option<std::path::PathBuf>,
    /// Optional IDF weight file for the index
    #[arg(long)]
    idf: Option<std::path::PathBuf>,
    /// Load the whole index up front instead of reading classes on demand
    #[arg(long)]
    full_load: bool,
    /// Suggest matching labels instead of searching the index
    #[arg(long)]
    suggest: bool,
    /// Emit JSON (NDJSON)
    #[arg(long)]
    json: bool,
    /// Limit number of results
    #[arg(long)]
    limit: Option<usize>,
    /// Fail on duplicate label names instead of keeping the first
    #[arg(long)]
    strict_labels: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let catalog = {
        let path = args.labels.clone();
        let strict = args.strict_labels;
        Background::spawn(move || LabelCatalog::load_with(&path, strict))
    };
    let catalog = catalog.wait().map_err(anyhow::Error::msg)?;

    let token = CancelToken::new();
    if args.suggest {
        let engine = SuggestionEngine::new(catalog);
        let items = engine.suggest(&args.query, &token).unwrap_or_default();
        let shown = items.iter().take(args.limit.unwrap_or(usize::MAX));
        if args.json {
            for item in shown {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            for item in shown {
                println!("{:.3}\t{}\t{}", item.score(), item.searchable_text, item.name);
            }
        }
        return Ok(());
    }

    let index_path = args
        .index
        .context("--index is required unless --suggest is given")?;
    let source = if args.full_load {
        IndexSource::Memory(KeywordIndex::load(&index_path)?)
    } else {
        IndexSource::Disk(DiskIndex::open(&index_path)?)
    };
    let resolver = match &args.idf {
        Some(path) => QueryResolver::with_idf(source, IdfTable::load(path)?),
        None => QueryResolver::new(source),
    };

    match resolver.search_text(&args.query, &catalog, &token) {
        Ok(Some(ranked)) => {
            let shown = ranked.iter().take(args.limit.unwrap_or(usize::MAX));
            if args.json {
                for posting in shown {
                    println!(
                        "{}",
                        serde_json::json!({ "item": posting.item, "weight": posting.weight })
                    );
                }
            } else {
                for posting in shown {
                    println!("{}\t{:.6}", posting.item, posting.weight);
                }
            }
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
