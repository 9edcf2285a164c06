//! Castle CLI - Command-line interface
//!
//! Usage:
//!   castle extract <input> [--graph facts.ttl] [--format turtle]
//!   castle relations

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use castle_core::{AppConfig, GraphFormat, LoggingConfig};
use castle_extractor::document::read_document;
use castle_extractor::report::{write_entity_report, write_phrases};
use castle_extractor::{Pipeline, RelationTable, RunReport};
use castle_graph::{standard_prefixes, write_graph, RdfGraph, TripleStore};

#[derive(Parser)]
#[command(name = "castle")]
#[command(about = "Extract RDF facts from plain-text documents")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extraction pipeline over a document
    Extract {
        /// Input text file
        input: PathBuf,

        /// Where to write extracted phrases
        #[arg(long)]
        phrases: Option<PathBuf>,

        /// Where to write the RDF graph
        #[arg(long)]
        graph: Option<PathBuf>,

        /// Graph serialization (turtle, ntriples)
        #[arg(long)]
        format: Option<GraphFormat>,

        /// Write a CSV of every tagged entity
        #[arg(long)]
        entities: Option<PathBuf>,

        /// Write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the relation keyword table
    Relations,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "castle={0},castle_extractor={0},castle_graph={0}",
            logging.level
        ))
    });

    if logging.json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    init_logging(&config.logging);

    match cli.command {
        Commands::Extract {
            input,
            phrases,
            graph,
            format,
            entities,
            report,
        } => {
            let output = &mut config.output;
            if let Some(path) = phrases {
                output.phrases_path = path;
            }
            if let Some(path) = graph {
                output.graph_path = path;
            }
            if let Some(format) = format {
                output.graph_format = format;
            }
            if entities.is_some() {
                output.entity_report_path = entities;
            }
            if report.is_some() {
                output.run_report_path = report;
            }

            extract(&config, input)
        }
        Commands::Relations => {
            let table = RelationTable::from_config(&config.relations)?;
            for rule in table.rules() {
                println!("{:<20} {}", rule.keyword, rule.relation);
            }
            Ok(())
        }
    }
}

fn extract(config: &AppConfig, input: PathBuf) -> anyhow::Result<()> {
    let output = &config.output;
    let run = RunReport::start(Some(input.clone()));

    let document = read_document(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let pipeline = Pipeline::from_config(config)?;
    let extraction = pipeline.run(&document);

    write_phrases(&output.phrases_path, &extraction.phrases)
        .context("failed to write phrases")?;

    let mut graph = RdfGraph::new();
    let added = graph.extend(extraction.triples.iter().cloned());
    if added < extraction.triples.len() {
        tracing::debug!(
            duplicates = extraction.triples.len() - added,
            "duplicate statements merged"
        );
    }

    let prefixes = standard_prefixes(pipeline.triple_builder().base());
    write_graph(&output.graph_path, &graph, output.graph_format, &prefixes)
        .context("failed to write graph")?;

    if let Some(path) = &output.entity_report_path {
        write_entity_report(path, &extraction.tagged)
            .context("failed to write entity report")?;
    }

    let run = run.finish(extraction.stats);
    if let Some(path) = &output.run_report_path {
        run.write_json(path).context("failed to write run report")?;
    }

    tracing::info!(
        run_id = %run.run_id,
        phrases = extraction.phrases.len(),
        triples = graph.len(),
        graph = %output.graph_path.display(),
        "done"
    );

    Ok(())
}
