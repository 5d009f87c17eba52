//! scorepack command line.
//!
//! ```bash
//! # Score the bundled housing model; omitted values take the training mean
//! scorepack housing --income 70000 --house-age 6 --rooms 7 --bedrooms 4 --population 36000
//!
//! # Build a package from a snapshot and its training data
//! scorepack package --model housing.model.json --train train.json \
//!     --prefix HousingModel --target Price --out ./HousingModel
//!
//! # Score with a package
//! scorepack score --package ./HousingModel --set Avg_Area_Income=70000
//! scorepack score --package ./HousingModel --records rows.json
//! ```
//!
//! Logging goes to stderr. `RUST_LOG` sets the filter (default
//! `scorepack=info`); `SCOREPACK_LOG_FORMAT=json` switches to JSON lines.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorepack::housing::OUTPUT_NAME;
use scorepack::{
    FeatureValue, HousingRecord, HousingScorer, Model, ModelPropertiesConfig, PackageConfig,
    ScoreOutput, ScorePackage, Table,
};

#[derive(Parser, Debug)]
#[command(name = "scorepack")]
#[command(version, about = "Package and score linear regression models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score with a package directory
    Score {
        /// Package directory
        #[arg(short, long)]
        package: PathBuf,

        /// Input value as NAME=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// JSON array of records to score instead of --set
        #[arg(short, long, conflicts_with = "set")]
        records: Option<PathBuf>,
    },

    /// Score the bundled housing-price model
    Housing {
        /// Model snapshot to use instead of the bundled one
        #[arg(long)]
        model: Option<PathBuf>,

        #[arg(long)]
        income: Option<String>,

        #[arg(long)]
        house_age: Option<String>,

        #[arg(long)]
        rooms: Option<String>,

        #[arg(long)]
        bedrooms: Option<String>,

        #[arg(long)]
        population: Option<String>,
    },

    /// Build a package directory
    Package {
        /// Model snapshot (`*.model.json`)
        #[arg(short, long)]
        model: PathBuf,

        /// Training data: JSON array of records
        #[arg(short, long)]
        train: PathBuf,

        /// File name prefix
        #[arg(long)]
        prefix: String,

        /// Target variable
        #[arg(long)]
        target: String,

        /// Output variable name (repeatable; defaults to the target)
        #[arg(long = "output-name")]
        output_names: Vec<String>,

        /// Target class value (repeatable; first is the event)
        #[arg(long = "target-value")]
        target_values: Vec<String>,

        /// Classification cutoff
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "Linear regression")]
        algorithm: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Print a model snapshot's parameters
    Inspect {
        #[arg(short, long)]
        model: PathBuf,
    },
}

fn main() {
    let log_format = std::env::var("SCOREPACK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scorepack=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Score {
            package,
            set,
            records,
        } => {
            let package = ScorePackage::open(&package)
                .with_context(|| format!("opening package {}", package.display()))?;
            let scorer = package.scorer()?;
            let names = scorer.output_names();

            let output = match records {
                Some(path) => {
                    let records = read_records(&path)
                        .with_context(|| format!("reading records from {}", path.display()))?;
                    let rows: Vec<Value> = scorer
                        .score_records(&records)
                        .iter()
                        .map(|out| output_json(out, names))
                        .collect();
                    Value::Array(rows)
                }
                None => {
                    let record = parse_assignments(&set)?;
                    output_json(&scorer.score_record(&record), names)
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Housing {
            model,
            income,
            house_age,
            rooms,
            bedrooms,
            population,
        } => {
            let scorer = match model {
                Some(path) => HousingScorer::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => HousingScorer::bundled(),
            };
            let record = HousingRecord::new(
                parse_value(income.as_deref()),
                parse_value(house_age.as_deref()),
                parse_value(rooms.as_deref()),
                parse_value(bedrooms.as_deref()),
                parse_value(population.as_deref()),
            );
            let mut output = Map::new();
            output.insert(OUTPUT_NAME.to_string(), json!(scorer.score(&record)));
            println!("{}", Value::Object(output));
        }

        Command::Package {
            model,
            train,
            prefix,
            target,
            output_names,
            target_values,
            threshold,
            description,
            algorithm,
            out,
        } => {
            let snapshot = Model::load_json(&model)
                .with_context(|| format!("loading {}", model.display()))?;
            let table = Table::load_json(&train)
                .with_context(|| format!("reading training data from {}", train.display()))?;

            let properties = ModelPropertiesConfig::new(prefix.as_str(), target.as_str())
                .target_values(target_values)
                .description(description)
                .algorithm(algorithm)
                .train_table(train.display().to_string());
            let mut config = PackageConfig::new(prefix.as_str(), properties);
            if !output_names.is_empty() {
                config = config.output_names(output_names);
            }
            if let Some(threshold) = threshold {
                config = config.threshold(threshold);
            }

            let package = ScorePackage::build(snapshot, &table, &config)?;
            package
                .write(&out)
                .with_context(|| format!("writing package to {}", out.display()))?;
        }

        Command::Inspect { model } => {
            let snapshot = Model::load_json(&model)
                .with_context(|| format!("loading {}", model.display()))?;
            let linear = snapshot.linear();
            let names: Vec<String> = match snapshot.feature_names() {
                Some(names) => names.to_vec(),
                None => (0..linear.n_features()).map(|i| format!("x{i}")).collect(),
            };
            let coefficients: Map<String, Value> = names
                .into_iter()
                .zip(linear.coefficients().iter())
                .map(|(name, &c)| (name, json!(c)))
                .collect();
            let report = json!({
                "library": snapshot.library(),
                "n_features": linear.n_features(),
                "intercept": linear.intercept(),
                "coefficients": coefficients,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Read a JSON array of records. Cell values are not checked here.
fn read_records(path: &Path) -> Result<Vec<Value>> {
    let file = File::open(path)?;
    match serde_json::from_reader(BufReader::new(file))? {
        Value::Array(records) => Ok(records),
        _ => bail!("expected a JSON array of records"),
    }
}

/// Parse `NAME=VALUE` pairs into a record. Unparsable values stay as text.
fn parse_assignments(assignments: &[String]) -> Result<Map<String, Value>> {
    let mut record = Map::new();
    for assignment in assignments {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("expected NAME=VALUE, got '{assignment}'");
        };
        let value = match value.trim().parse::<f64>() {
            Ok(v) => json!(v),
            Err(_) => Value::String(value.to_string()),
        };
        record.insert(name.trim().to_string(), value);
    }
    Ok(record)
}

fn parse_value(raw: Option<&str>) -> FeatureValue {
    match raw {
        None => FeatureValue::Missing,
        Some(s) => s.trim().parse::<f64>().map_or(FeatureValue::Other, FeatureValue::Number),
    }
}

fn output_json(output: &ScoreOutput, names: &[String]) -> Value {
    let fields: Map<String, Value> = output
        .fields(names)
        .into_iter()
        .map(|(name, v)| (name.to_string(), json!(v)))
        .collect();
    Value::Object(fields)
}
