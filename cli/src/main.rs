//! basketgraph CLI: run the basket analysis over JSON input files

mod loader;

use anyhow::{Context, Result};
use basketgraph::{
    AnalysisConfig, AnalysisReport, BasketAnalyzer, ElasticityEstimate, RelationshipScore,
};
use clap::Parser;
use comfy_table::{ContentArrangement, Table};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "basketgraph",
    version,
    about = "Complement and substitute discovery from market baskets"
)]
struct Cli {
    /// JSON array of transaction records
    #[arg(long)]
    transactions: PathBuf,

    /// JSON array of {product_id, category} rows
    #[arg(long)]
    categories: Option<PathBuf>,

    /// YAML (or .json) analysis config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Null model trials
    #[arg(long)]
    trials: Option<usize>,

    /// Base seed for the null model
    #[arg(long)]
    seed: Option<u64>,

    /// Diffusion decay
    #[arg(long)]
    alpha: Option<f64>,

    /// Significance threshold on the combined score
    #[arg(long)]
    threshold: Option<f64>,

    /// Output format
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => loader::load_config(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(trials) = self.trials {
            config.null_model.trials = trials;
        }
        if let Some(seed) = self.seed {
            config.null_model.seed = Some(seed);
        }
        if let Some(alpha) = self.alpha {
            config.scoring.alpha = alpha;
        }
        if let Some(threshold) = self.threshold {
            config.scoring.threshold = threshold;
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.analysis_config()?;
    let records = loader::load_transactions(&cli.transactions)?;
    let categories = match &cli.categories {
        Some(path) => loader::load_categories(path)?,
        None => Default::default(),
    };

    let report = BasketAnalyzer::new(config)
        .run(&records, &categories)
        .context("analysis failed")?;

    match cli.format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Table => print_tables(&report),
    }
    Ok(())
}

fn print_tables(report: &AnalysisReport) {
    println!(
        "{} transactions, {} products, {} product edges (seed {}, {}/{} trials)",
        report.graph.transactions,
        report.graph.products,
        report.graph.product_edges,
        report.sampling.seed,
        report.sampling.completed,
        report.sampling.requested,
    );

    println!("\nComplements");
    println!("{}", score_table(&report.complements));
    println!("\nSubstitutes");
    println!("{}", score_table(&report.substitutes));

    let mut communities = new_table(&["Community", "Size", "Members", "Dominant", "Purity"]);
    for community in &report.communities.communities {
        let validation = report.validation.iter().find(|v| v.community_id == community.id);
        let members: Vec<String> = community.members.iter().map(|m| m.to_string()).collect();
        communities.add_row(vec![
            community.id.to_string(),
            community.len().to_string(),
            members.join(", "),
            validation.map(|v| v.dominant_category.clone()).unwrap_or_else(|| "-".to_string()),
            validation.map(|v| format!("{:.2}", v.purity)).unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("\nCommunities (modularity {:.4})", report.communities.modularity);
    println!("{}", communities);

    let mut roles = new_table(&["Product", "Role", "Betweenness", "Clustering"]);
    for (product, assignment) in &report.roles.assignments {
        roles.add_row(vec![
            product.to_string(),
            assignment.role.to_string(),
            format!("{:.4}", assignment.centrality),
            format!("{:.4}", assignment.clustering),
        ]);
    }
    println!("\nRoles");
    println!("{}", roles);

    let mut elasticities = new_table(&["Product", "Elasticity", "R²", "Observations"]);
    for (product, estimate) in &report.elasticities {
        let row = match estimate {
            ElasticityEstimate::Estimated {
                elasticity,
                r_squared,
                observations,
                ..
            } => vec![
                product.to_string(),
                format!("{:.3}", elasticity),
                format!("{:.3}", r_squared),
                observations.to_string(),
            ],
            ElasticityEstimate::InsufficientData { observations, .. } => vec![
                product.to_string(),
                "insufficient data".to_string(),
                "-".to_string(),
                observations.to_string(),
            ],
        };
        elasticities.add_row(row);
    }
    println!("\nPrice elasticity");
    println!("{}", elasticities);
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

fn score_table(scores: &[RelationshipScore]) -> Table {
    let mut table = new_table(&["Pair", "Actual", "Null mean", "z", "Diffusion", "Combined"]);
    for score in scores {
        table.add_row(vec![
            score.pair.to_string(),
            score.actual.to_string(),
            format!("{:.2}", score.null_mean),
            format!("{:.2}", score.z_score),
            format!("{:.4}", score.diffusion),
            format!("{:.3}", score.combined),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "basketgraph",
            "--transactions",
            "t.json",
            "--trials",
            "25",
            "--seed",
            "3",
            "--threshold",
            "0.5",
        ]);
        let config = cli.analysis_config().unwrap();
        assert_eq!(config.null_model.trials, 25);
        assert_eq!(config.null_model.seed, Some(3));
        assert_eq!(config.scoring.threshold, 0.5);
        assert_eq!(config.scoring.alpha, 0.15);
    }

    #[test]
    fn test_end_to_end_json() {
        use std::io::Write;

        let mut transactions = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let mut rows = Vec::new();
        for t in 1..=12u64 {
            rows.push(format!(
                r#"{{"transaction_id": {}, "product_id": "a", "quantity": {}, "price": {}}}"#,
                t,
                1 + t % 3,
                1.0 + (t % 4) as f64 * 0.1
            ));
            let other = if t % 2 == 0 { "b" } else { "c" };
            rows.push(format!(
                r#"{{"transaction_id": {}, "product_id": "{}", "quantity": 1, "price": 2.0}}"#,
                t, other
            ));
        }
        write!(transactions, "[{}]", rows.join(",")).unwrap();

        let cli = Cli::parse_from([
            "basketgraph",
            "--transactions",
            transactions.path().to_str().unwrap(),
            "--trials",
            "20",
            "--seed",
            "1",
            "--format",
            "json",
        ]);
        assert!(run(&cli).is_ok());
    }
}
