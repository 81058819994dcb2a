//! cryptoql CLI
//!
//! Validate taxonomies, compile them into CodeQL queries, and classify
//! identifiers against the compiled rules.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cryptoql_core::config::{CliOverrides, CryptoqlConfig};
use cryptoql_core::errors::{ConfigError, CryptoqlError, CryptoqlErrorCode, TaxonomyError};
use cryptoql_core::Surface;
use cryptoql_rules::compiler::ClassificationReport;
use cryptoql_rules::taxonomy::{load_document, Taxonomy};
use cryptoql_rules::Pipeline;

#[derive(Parser)]
#[command(name = "cryptoql", version)]
#[command(about = "Compile a cryptographic-algorithm taxonomy into boundary-safe matching rules", long_about = None)]
struct Cli {
    /// Project root holding cryptoql.toml
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a taxonomy and report every issue
    Check {
        /// Taxonomy document (.json or .toml)
        #[arg(long)]
        taxonomy: Option<String>,
    },

    /// Compile a taxonomy and write the CodeQL queries
    Compile {
        /// Taxonomy document (.json or .toml)
        #[arg(long)]
        taxonomy: Option<String>,

        /// Output directory
        #[arg(long)]
        out: Option<String>,

        /// Surfaces to compile (function_name, macro_name, argument)
        #[arg(long = "surface")]
        surfaces: Vec<String>,

        /// Leave out operation-mode rules
        #[arg(long)]
        no_modes: bool,
    },

    /// Classify identifiers against the compiled rules
    Classify {
        /// Taxonomy document (.json or .toml)
        #[arg(long)]
        taxonomy: Option<String>,

        /// Surface whose rules to use
        #[arg(long, default_value = "function_name")]
        surface: String,

        /// Identifiers to classify
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
}

fn main() -> ExitCode {
    cryptoql_core::tracing::init_tracing();
    let cli = Cli::parse();
    tracing::debug!(root = %cli.root.display(), json = cli.json, "cryptoql starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.coded_string());
            for issue in issues(&e) {
                eprintln!("  - {issue}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CryptoqlError> {
    match cli.command {
        Commands::Check { taxonomy } => {
            let config = load_config(&cli.root, CliOverrides {
                taxonomy_path: taxonomy,
                ..Default::default()
            })?;
            check(&config, cli.json)
        }
        Commands::Compile {
            taxonomy,
            out,
            surfaces,
            no_modes,
        } => {
            let config = load_config(&cli.root, CliOverrides {
                taxonomy_path: taxonomy,
                output_dir: out,
                surfaces,
                include_modes: no_modes.then_some(false),
            })?;
            let written = Pipeline::new(config).run()?;
            if cli.json {
                let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
                println!("{}", to_json(&paths));
            } else {
                for path in written {
                    println!("{}", path.display());
                }
            }
            Ok(())
        }
        Commands::Classify {
            taxonomy,
            surface,
            identifiers,
        } => {
            let surface = Surface::parse_str(&surface).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "surface".to_string(),
                    message: format!("unknown surface '{surface}'"),
                }
            })?;
            let config = load_config(&cli.root, CliOverrides {
                taxonomy_path: taxonomy,
                ..Default::default()
            })?;
            let pipeline = Pipeline::new(config);
            let taxonomy = pipeline.load_taxonomy()?;
            let rules = pipeline.rule_set(&taxonomy, surface)?;

            let reports: Vec<Option<ClassificationReport>> = rules
                .classify_batch(&identifiers)
                .into_iter()
                .zip(&identifiers)
                .map(|(c, id)| c.map(|c| c.report(id)))
                .collect();

            if cli.json {
                println!("{}", to_json(&reports));
            } else {
                for (id, report) in identifiers.iter().zip(&reports) {
                    match report {
                        Some(r) => println!(
                            "{id}\t{}/{}\t{}\t{}",
                            r.category, r.subcategory, r.alternative, r.matched
                        ),
                        None => println!("{id}\t-"),
                    }
                }
            }
            Ok(())
        }
    }
}

fn load_config(root: &Path, overrides: CliOverrides) -> Result<CryptoqlConfig, CryptoqlError> {
    Ok(CryptoqlConfig::load(root, Some(&overrides))?)
}

fn check(config: &CryptoqlConfig, json: bool) -> Result<(), CryptoqlError> {
    let path = config.taxonomy.path_buf().ok_or_else(|| {
        ConfigError::ValidationFailed {
            field: "taxonomy.path".to_string(),
            message: "no taxonomy file configured".to_string(),
        }
    })?;
    let doc = load_document(&path)?;
    let taxonomy = Taxonomy::from_document(&doc)?;

    if json {
        let summary = serde_json::json!({
            "path": path.display().to_string(),
            "categories": taxonomy.categories().len(),
            "subcategories": taxonomy.subcategory_count(),
            "modes": taxonomy.modes().len(),
            "fingerprint": format!("{:016x}", taxonomy.fingerprint()),
        });
        println!("{}", to_json(&summary));
    } else {
        println!(
            "{}: ok ({} categories, {} subcategories, {} modes, fingerprint {:016x})",
            path.display(),
            taxonomy.categories().len(),
            taxonomy.subcategory_count(),
            taxonomy.modes().len(),
            taxonomy.fingerprint()
        );
    }
    Ok(())
}

/// Validation issues carried by `e`, one per line on stderr.
fn issues(e: &CryptoqlError) -> Vec<String> {
    match e {
        CryptoqlError::Taxonomy(t @ TaxonomyError::Invalid { .. }) => {
            t.issues().iter().map(ToString::to_string).collect()
        }
        _ => Vec::new(),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
