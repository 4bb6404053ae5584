//! papersrch — local search over a PubMed corpus.
//!
//! Loads a JSONL corpus, builds the search engine once, and dispatches one
//! subcommand: ranked search, facet counts, yearly counts, or co-author
//! analytics. All rendering and file export happens here; the core returns
//! plain data.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use papersrch_core::analytics::FacetDimension;
use papersrch_core::config;
use papersrch_core::corpus::load_jsonl;
use papersrch_core::{EngineError, SearchEngine, SearchQuery, SearchResult};

#[derive(Parser)]
#[command(name = "papersrch", about = "Local search over a PubMed corpus")]
struct Cli {
    /// Path to the JSONL corpus file
    #[arg(long, default_value = "data/papers/papers.jsonl")]
    corpus: PathBuf,

    /// Directory for exported files
    #[arg(long, default_value = "outputs")]
    outputs: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ranked search with boolean operators and metadata filters
    Search(SearchArgs),
    /// Facet counts over one dimension
    Facets {
        /// journal, year or author
        #[arg(long)]
        by: String,
    },
    /// Yearly publication counts, optionally restricted to search results
    Yearly {
        #[command(flatten)]
        search: SearchArgs,
        /// Count only the documents matching the search arguments
        #[arg(long)]
        filtered: bool,
    },
    /// Co-author graph and centrality metrics over search results
    Coauthors(SearchArgs),
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Query terms separated by ;
    #[arg(long, default_value = "")]
    query: String,

    /// Boolean operator: AND, OR or NOT
    #[arg(long, default_value = "AND")]
    op: String,

    /// Fields to search: ti, ab or tiab
    #[arg(long, default_value = "tiab")]
    fields: String,

    /// Minimum publication year
    #[arg(long, default_value_t = config::DEFAULT_YEAR_MIN)]
    year_min: i32,

    /// Maximum publication year
    #[arg(long)]
    year_max: Option<i32>,

    /// Journal include substrings, separated by ;
    #[arg(long, default_value = "")]
    journal_include: String,

    /// Journal exclude substrings, separated by ;
    #[arg(long, default_value = "")]
    journal_exclude: String,

    /// Author substring filter
    #[arg(long, default_value = "")]
    author: String,

    /// Keep only documents with a DOI
    #[arg(long)]
    has_doi: bool,

    /// Exclude documents containing any of these terms, separated by ;
    #[arg(long, default_value = "")]
    exclude: String,

    /// Maximum number of results
    #[arg(long, default_value_t = config::DEFAULT_RESULT_LIMIT)]
    k: usize,

    /// Base name for exported result files
    #[arg(long)]
    export_base: Option<String>,
}

impl SearchArgs {
    fn to_query(&self) -> Result<SearchQuery, EngineError> {
        Ok(SearchQuery {
            terms: parse_terms(&self.query),
            op: self.op.parse()?,
            fields: self.fields.parse()?,
            year_min: Some(self.year_min),
            year_max: self.year_max,
            journal_include: parse_terms(&self.journal_include),
            journal_exclude: parse_terms(&self.journal_exclude),
            author: (!self.author.is_empty()).then(|| self.author.clone()),
            require_doi: self.has_doi,
            exclude_terms: parse_terms(&self.exclude),
            limit: self.k,
        })
    }
}

/// Split a `;`-separated argument into trimmed, unquoted, non-empty terms.
fn parse_terms(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(|p| p.trim().trim_matches('"').to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("papersrch=info".parse().expect("valid directive literal"))
                .add_directive(
                    "papersrch_core=info"
                        .parse()
                        .expect("valid directive literal"),
                ),
        )
        .init();

    let cli = Cli::parse();
    let engine = SearchEngine::new(load_jsonl(&cli.corpus)?)?;

    match &cli.command {
        Command::Search(args) => run_search(&engine, args, &cli.outputs)?,
        Command::Facets { by } => run_facets(&engine, by)?,
        Command::Yearly { search, filtered } => run_yearly(&engine, search, *filtered)?,
        Command::Coauthors(args) => run_coauthors(&engine, args, &cli.outputs)?,
    }
    Ok(())
}

fn run_search(
    engine: &SearchEngine,
    args: &SearchArgs,
    outputs: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = engine.search(&args.to_query()?);
    if results.is_empty() {
        println!("No results");
        return Ok(());
    }

    println!("Showing {} results:\n", results.len());
    println!(
        "{:<4} {:<6} {:<4} {:<20} {:<10} {:<15} title / explain",
        "rank", "score", "year", "journal", "pmid", "doi"
    );
    for (i, r) in results.iter().enumerate() {
        let title = truncate(&r.title, 120);
        let year = r.year.map_or_else(|| "-".to_string(), |y| y.to_string());
        println!(
            "{:<4} {:<6.3} {:<4} {:<20} {:<10} {:<15} {} [{}]",
            i + 1,
            r.score,
            year,
            truncate(&r.journal, 20),
            r.pmid,
            truncate(&r.doi, 15),
            title,
            r.explanation.join(","),
        );
    }

    if let Some(base) = &args.export_base {
        export_results(&results, base, outputs)?;
    }
    Ok(())
}

fn export_results(
    results: &[SearchResult],
    base: &str,
    outputs: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(outputs)?;

    let results_path = outputs.join(format!("{base}_results.jsonl"));
    let mut file = fs::File::create(&results_path)?;
    for r in results {
        serde_json::to_writer(&mut file, r)?;
        file.write_all(b"\n")?;
    }

    let citations_path = outputs.join(format!("{base}_citations.txt"));
    let mut citations = String::new();
    for r in results {
        citations.push_str(&r.citation_apa);
        citations.push('\n');
    }
    fs::write(&citations_path, citations)?;

    println!(
        "Exported to {} and {}",
        results_path.display(),
        citations_path.display()
    );
    Ok(())
}

fn run_facets(engine: &SearchEngine, by: &str) -> Result<(), Box<dyn std::error::Error>> {
    let dimension: FacetDimension = by.parse()?;
    println!("{:<40} {:>6} {:>7}", by, "count", "pct");
    for row in engine.facets(dimension) {
        println!("{:<40} {:>6} {:>6.1}%", truncate(&row.value, 40), row.count, row.pct);
    }
    Ok(())
}

fn run_yearly(
    engine: &SearchEngine,
    args: &SearchArgs,
    filtered: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pmids = if filtered && !parse_terms(&args.query).is_empty() {
        Some(search_pmids(engine, args)?)
    } else {
        None
    };
    let counts = engine.yearly_counts(pmids.as_deref());
    if counts.is_empty() {
        println!("No publications in range");
        return Ok(());
    }
    println!("{:<6} count", "year");
    for (year, count) in counts {
        println!("{year:<6} {count}");
    }
    Ok(())
}

fn run_coauthors(
    engine: &SearchEngine,
    args: &SearchArgs,
    outputs: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let pmids = search_pmids(engine, args)?;
    if pmids.is_empty() {
        println!("No data for coauthors");
        return Ok(());
    }
    let (graph, metrics) = engine.coauthor_network(&pmids);
    tracing::info!(
        "Co-author graph: {} authors, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    fs::create_dir_all(outputs)?;
    let edges_path = outputs.join("coauthors_edges.jsonl");
    let mut file = fs::File::create(&edges_path)?;
    for (source, target, weight) in graph.edges() {
        serde_json::to_writer(
            &mut file,
            &serde_json::json!({ "source": source, "target": target, "weight": weight }),
        )?;
        file.write_all(b"\n")?;
    }

    let metrics_path = outputs.join("coauthors_metrics.jsonl");
    let mut file = fs::File::create(&metrics_path)?;
    for m in &metrics {
        serde_json::to_writer(&mut file, m)?;
        file.write_all(b"\n")?;
    }

    println!("Saved {} and {}", edges_path.display(), metrics_path.display());
    Ok(())
}

/// Run the search with the result cap lifted, returning matching PMIDs for
/// the analytics subcommands.
fn search_pmids(engine: &SearchEngine, args: &SearchArgs) -> Result<Vec<String>, EngineError> {
    let mut query = args.to_query()?;
    query.limit = 1000;
    Ok(engine.search(&query).into_iter().map(|r| r.pmid).collect())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms() {
        assert_eq!(parse_terms(""), Vec::<String>::new());
        assert_eq!(parse_terms("celiac; \"miR-21\" ;"), vec!["celiac", "miR-21"]);
    }

    #[test]
    fn test_search_args_roundtrip() {
        let args = SearchArgs {
            query: "ibd; celiac".into(),
            op: "or".into(),
            fields: "ti".into(),
            year_min: 2021,
            year_max: Some(2024),
            journal_include: "gut".into(),
            journal_exclude: String::new(),
            author: String::new(),
            has_doi: true,
            exclude: "mouse".into(),
            k: 5,
            export_base: None,
        };
        let query = args.to_query().unwrap();
        assert_eq!(query.terms, vec!["ibd", "celiac"]);
        assert_eq!(query.year_min, Some(2021));
        assert!(query.require_doi);
        assert_eq!(query.limit, 5);
        assert!(query.author.is_none());
    }

    #[test]
    fn test_invalid_operator_surfaces() {
        let args = SearchArgs {
            query: "ibd".into(),
            op: "NAND".into(),
            fields: "tiab".into(),
            year_min: 2020,
            year_max: None,
            journal_include: String::new(),
            journal_exclude: String::new(),
            author: String::new(),
            has_doi: false,
            exclude: String::new(),
            k: 30,
            export_base: None,
        };
        assert!(matches!(
            args.to_query(),
            Err(EngineError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
        assert_eq!(truncate("a very long title indeed", 10), "a very ...");
    }
}
