//! ktax - Taxonomy translation tool
//!
//! Rebuilds the taxonomy implied by a classification-database inspection
//! report and emits the `taxid -> lineage` mapping consumed by downstream
//! per-read annotation.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ktax_common::logging::{init_logging, LogConfig, LogLevel};
use ktax_common::KtaxError;
use ktax_core::{build_lineage_index, TaxonomyTree};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "ktax")]
#[command(author, version, about = "Taxonomy translation for classification-database inspection reports")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the taxid -> lineage mapping from an inspection report
    Translate {
        /// Inspection report emitted by the classification database
        #[arg(short, long)]
        report: PathBuf,

        /// File to write the mapping to (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: Format,

        /// Per-read classification outputs destined for downstream
        /// annotation; validated for existence alongside the report
        classified: Vec<PathBuf>,
    },

    /// Print the reconstructed taxonomy hierarchy
    Tree {
        /// Inspection report emitted by the classification database
        #[arg(short, long)]
        report: PathBuf,
    },
}

/// Mapping output format
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    /// Tab-separated `taxid\tlineage` rows, sorted by taxid
    Tsv,
    /// One JSON object keyed by taxid
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbose flag
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("ktax".to_string())
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    match cli.command {
        Command::Translate {
            report,
            output,
            format,
            classified,
        } => {
            validate_inputs(std::iter::once(&report).chain(classified.iter()))?;

            info!(
                report = %report.display(),
                classified_files = classified.len(),
                "translating inspection report"
            );

            let tree = load_tree(&report)?;
            let stats = tree.stats();
            info!(
                total = stats.total_taxa,
                ranked = stats.ranked_taxa,
                unranked = stats.unranked_taxa,
                "taxonomy reconstructed"
            );
            debug!("reconstructed hierarchy:\n{}", tree.render());

            let mapping = build_lineage_index(&tree);
            write_mapping(&mapping, output.as_deref(), format)?;
            info!(lineages = mapping.len(), "translation complete");
        },
        Command::Tree { report } => {
            validate_inputs(std::iter::once(&report))?;

            let tree = load_tree(&report)?;
            std::io::stdout().write_all(tree.render().as_bytes())?;
        },
    }

    Ok(())
}

/// Abort with a path-naming error before any parsing if a supplied input
/// does not exist.
fn validate_inputs<'a>(paths: impl Iterator<Item = &'a PathBuf>) -> std::result::Result<(), KtaxError> {
    for path in paths {
        if !path.exists() {
            return Err(KtaxError::missing_input(path));
        }
    }
    Ok(())
}

/// Read the report and reconstruct the taxonomy
fn load_tree(report: &Path) -> Result<TaxonomyTree> {
    let content = fs::read_to_string(report)
        .with_context(|| format!("Failed to read report '{}'", report.display()))?;
    Ok(TaxonomyTree::from_report(&content)?)
}

/// Serialize the mapping and write it to the output path or stdout
fn write_mapping(
    mapping: &HashMap<String, String>,
    output: Option<&Path>,
    format: Format,
) -> Result<()> {
    let rendered = render_mapping(mapping, format)?;

    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write mapping to '{}'", path.display()))?,
        None => std::io::stdout().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

/// Render the mapping in the requested format, keys sorted for stable
/// output across runs
fn render_mapping(mapping: &HashMap<String, String>, format: Format) -> Result<String> {
    // HashMap iteration order is arbitrary; emit sorted so identical input
    // produces byte-identical files.
    let ordered: BTreeMap<&String, &String> = mapping.iter().collect();

    match format {
        Format::Tsv => {
            let mut out = String::new();
            for (taxid, lineage) in ordered {
                out.push_str(taxid);
                out.push('\t');
                out.push_str(lineage);
                out.push('\n');
            }
            Ok(out)
        },
        Format::Json => {
            let mut out = serde_json::to_string_pretty(&ordered)?;
            out.push('\n');
            Ok(out)
        },
    }
}
