//! `symptom-synth`: generate, inspect and balance datasets, train the model,
//! and serve predictions.

mod server;

use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use symptom_synth_core::dataset::{
    balance_seeded, class_distribution, manifest_path, read_csv_file, rows_from_samples,
    write_csv_file, DatasetRow, RunManifest,
};
use symptom_synth_core::{DatasetGenerator, GeneratorConfig, Language, OverlapMetric, SeedCatalog};
use symptom_synth_predict::augment::translate_rows;
use symptom_synth_predict::{
    build_report, load_or_train, train, LexiconTranslator, ModelArtifacts, PredictionService,
    PredictorConfig, TrainingMetrics, Translator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::server::AppState;

#[derive(Parser, Debug)]
#[command(name = "symptom-synth", about = "Multilingual symptom dataset generator and disease predictor", version)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic dataset and its run manifest
    Generate(GenerateArgs),
    /// Resample every class to the smallest class size
    Balance(BalanceArgs),
    /// Print the class distribution of a dataset
    Stats(StatsArgs),
    /// Check a dataset against its run manifest
    Verify(StatsArgs),
    /// Train a model and write its artifacts
    Train(ModelArgs),
    /// Predict diseases for one symptom description
    Predict(PredictArgs),
    /// Serve the prediction web form
    Serve(ServeArgs),
    /// Append machine-translated copies of rows in one language
    Augment(AugmentArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    PriorCoverage,
    Jaccard,
}

impl From<MetricArg> for OverlapMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::PriorCoverage => OverlapMetric::PriorCoverage,
            MetricArg::Jaccard => OverlapMetric::Jaccard,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Generator config (JSON); flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disease catalog (JSON array); defaults to the built-in catalog
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[arg(long, short, value_name = "FILE", default_value = "synthetic_data.csv")]
    out: PathBuf,

    #[arg(long)]
    per_disease: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_overlap: Option<f64>,

    #[arg(long)]
    max_tries: Option<usize>,

    /// Comma-separated: en, bn, banglish, mixed
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<Language>>,

    #[arg(long, value_enum)]
    overlap_metric: Option<MetricArg>,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    #[arg(long, short, value_name = "FILE", default_value = "synthetic_data.csv")]
    input: PathBuf,

    #[arg(long, short, value_name = "FILE", default_value = "balanced_data.csv")]
    out: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[arg(long, short, value_name = "FILE", default_value = "synthetic_data.csv")]
    input: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// Predictor config (JSON); flags override its values
    #[arg(long, value_name = "FILE")]
    predictor_config: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    model_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// LibreTranslate-compatible endpoint
    #[arg(long, value_name = "URL")]
    translate_url: Option<String>,

    /// Train with the ONNX sentence encoder in DIR (model.onnx, tokenizer.json)
    #[arg(long, value_name = "DIR")]
    onnx_model_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PredictArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Print the prediction as JSON
    #[arg(long)]
    json: bool,

    /// Symptom description
    text: String,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    model: ModelArgs,

    #[arg(long, default_value = "127.0.0.1:8501")]
    addr: SocketAddr,
}

#[derive(Args, Debug)]
struct AugmentArgs {
    #[arg(long, short, value_name = "FILE", default_value = "synthetic_data.csv")]
    input: PathBuf,

    #[arg(long, short, value_name = "FILE", default_value = "augmented_multilingual_dataset.csv")]
    out: PathBuf,

    #[arg(long, default_value = "en")]
    source: String,

    #[arg(long, default_value = "bn")]
    target: String,

    /// LibreTranslate-compatible endpoint
    #[arg(long, value_name = "URL")]
    translate_url: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Balance(args) => balance(args),
        Command::Stats(args) => stats(args),
        Command::Verify(args) => verify(args),
        Command::Train(args) => train_model(args),
        Command::Predict(args) => predict(args),
        Command::Serve(args) => serve(args),
        Command::Augment(args) => augment(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(v) = args.per_disease {
        config.per_disease = v;
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }
    if let Some(v) = args.max_overlap {
        config.max_overlap = v;
    }
    if let Some(v) = args.max_tries {
        config.max_tries = v;
    }
    if let Some(v) = args.languages {
        config.languages = v;
    }
    if let Some(v) = args.overlap_metric {
        config.overlap_metric = v.into();
    }

    let catalog = match &args.catalog {
        Some(path) => SeedCatalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?,
        None => SeedCatalog::builtin(),
    };

    let generator = DatasetGenerator::new(catalog, config).context("Invalid generator config")?;
    let report = generator.generate_seeded()?;

    let rows = rows_from_samples(&report.samples);
    let bytes = write_csv_file(&args.out, &rows)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    let manifest = RunManifest::new(generator.config(), &report, &bytes);
    let manifest_file = manifest_path(&args.out);
    manifest
        .write_json(&manifest_file)
        .with_context(|| format!("Failed to write {}", manifest_file.display()))?;

    info!(
        rows = rows.len(),
        exhausted = report.exhausted().count(),
        out = %args.out.display(),
        sha256 = %manifest.csv_sha256,
        "Dataset written"
    );
    Ok(())
}

fn load_rows(path: &Path) -> Result<Vec<DatasetRow>> {
    read_csv_file(path).with_context(|| format!("Failed to read dataset {}", path.display()))
}

fn print_distribution(title: &str, counts: &BTreeMap<String, usize>) {
    println!("{}:", title);
    let mut sorted: Vec<(&String, &usize)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (label, count) in sorted {
        println!("  {:<32} {}", label, count);
    }
}

fn balance(args: BalanceArgs) -> Result<()> {
    let rows = load_rows(&args.input)?;
    print_distribution("Before balancing", &class_distribution(&rows));

    let balanced = balance_seeded(&rows, args.seed);
    print_distribution("After balancing", &class_distribution(&balanced));

    write_csv_file(&args.out, &balanced)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    info!(rows = balanced.len(), out = %args.out.display(), "Balanced dataset written");
    Ok(())
}

fn stats(args: StatsArgs) -> Result<()> {
    let rows = load_rows(&args.input)?;
    let counts = class_distribution(&rows);
    print_distribution("Class distribution", &counts);
    println!("{} rows, {} classes", rows.len(), counts.len());
    Ok(())
}

fn verify(args: StatsArgs) -> Result<()> {
    let manifest_file = manifest_path(&args.input);
    let manifest = RunManifest::read_json(&manifest_file)
        .with_context(|| format!("Failed to read manifest {}", manifest_file.display()))?;
    let bytes = fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input.display()))?;

    if !manifest.matches(&bytes) {
        bail!("{} does not match its manifest digest", args.input.display());
    }
    println!("OK: {} matches {}", args.input.display(), manifest.csv_sha256);
    Ok(())
}

fn predictor_config(args: &ModelArgs) -> Result<PredictorConfig> {
    let mut config = match &args.predictor_config {
        Some(path) => PredictorConfig::from_json_file(path)
            .with_context(|| format!("Failed to load predictor config {}", path.display()))?,
        None => PredictorConfig::default(),
    };
    if let Some(dir) = &args.model_dir {
        config.model_dir = dir.clone();
    }
    if let Some(path) = &args.dataset {
        config.dataset_path = path.clone();
    }
    if args.translate_url.is_some() {
        config.translate_url = args.translate_url.clone();
    }
    if args.onnx_model_dir.is_some() {
        config.training.onnx_model_dir = args.onnx_model_dir.clone();
    }
    Ok(config)
}

type BoxedTranslator = Box<dyn Translator + Send + Sync>;

fn make_translator(config: &PredictorConfig) -> Result<BoxedTranslator> {
    match &config.translate_url {
        Some(url) => {
            let client = symptom_synth_predict::HttpTranslator::new(url, config.translate_timeout_secs)
                .with_context(|| format!("Failed to create translation client for {}", url))?;
            Ok(Box::new(client))
        }
        None => Ok(Box::new(LexiconTranslator::new(config.canonical_language.clone()))),
    }
}

fn train_model(args: ModelArgs) -> Result<()> {
    let config = predictor_config(&args)?;
    let rows = load_rows(&config.dataset_path)?;
    let translator = make_translator(&config)?;
    let artifacts =
        train(&rows, &config.training, &*translator, &config.canonical_language).context("Training failed")?;
    artifacts
        .save(&config.model_dir)
        .with_context(|| format!("Failed to save model to {}", config.model_dir.display()))?;

    if let Some(metrics) = &artifacts.metrics {
        print_metrics(metrics);
    }
    Ok(())
}

fn print_metrics(metrics: &TrainingMetrics) {
    println!(
        "Embedder: {}  rows: {} train / {} validation  translated: {} ({} kept as-is)",
        metrics.embedder, metrics.train_rows, metrics.validation_rows, metrics.translated_rows, metrics.untranslated_rows
    );
    println!(
        "Accuracy: {:.3}  F1 (weighted): {:.3}  F1 (macro): {:.3}  LogLoss: {:.3}",
        metrics.accuracy, metrics.f1_weighted, metrics.report.macro_f1, metrics.log_loss
    );
    println!("
  {:<32} {:>9} {:>9} {:>9} {:>8}", "Disease", "Precision", "Recall", "F1", "Support");
    for c in &metrics.report.classes {
        println!(
            "  {:<32} {:>9.3} {:>9.3} {:>9.3} {:>8}",
            c.label, c.precision, c.recall, c.f1, c.support
        );
    }
}

fn build_service(config: &PredictorConfig) -> Result<(server::Service, ModelArtifacts)> {
    let translator = make_translator(config)?;
    let artifacts = load_or_train(config, &*translator).context("Failed to load or train model")?;
    let service = PredictionService::from_artifacts(artifacts.clone(), translator)
        .context("Failed to load the model's embedder")?
        .with_top_k(config.top_k)
        .with_canonical_language(config.canonical_language.clone())
        .with_explain_options(config.explain.clone());
    Ok((service, artifacts))
}

fn predict(args: PredictArgs) -> Result<()> {
    let config = predictor_config(&args.model)?;
    let (service, _) = build_service(&config)?;
    let rows = load_rows(&config.dataset_path)?;

    let report = build_report(&service, &rows, &args.text)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Detected language: {}", report.prediction.detected_language);
    for ranked in &report.prediction.top_k {
        println!("  {:<32} {:.4}", ranked.disease, ranked.probability);
    }
    if let Some(explanation) = &report.explanation {
        println!("\nWhy {}: {}", explanation.disease, explanation.summary());
    }
    for insight in &report.insights {
        println!("\n{}", insight.disease);
        println!("  Reasoning:      {}", insight.reasoning);
        println!("  Recommendation: {}", insight.recommendation);
        println!("  Explainability: {}", insight.explainability);
    }
    println!("\nUncertainty: {}", report.prediction.uncertainty);
    Ok(())
}

fn serve(args: ServeArgs) -> Result<()> {
    let config = predictor_config(&args.model)?;
    let (service, artifacts) = build_service(&config)?;
    let rows = load_rows(&config.dataset_path)?;

    let state = AppState {
        service: Arc::new(service),
        rows: Arc::new(rows),
        metrics: artifacts.metrics,
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::serve(args.addr, state))
}

fn augment(args: AugmentArgs) -> Result<()> {
    let rows = load_rows(&args.input)?;
    let translator = symptom_synth_predict::HttpTranslator::new(&args.translate_url, 30)
        .with_context(|| format!("Failed to create translation client for {}", args.translate_url))?;

    let (added, summary) = translate_rows(&rows, &translator, &args.source, &args.target);
    if added.is_empty() {
        bail!("No rows translated ({} candidates, {} failed)", summary.candidates, summary.failed);
    }

    let mut all = rows;
    all.extend(added);
    write_csv_file(&args.out, &all).with_context(|| format!("Failed to write {}", args.out.display()))?;
    println!(
        "Added {} {} rows ({} failed), saved to {}",
        summary.translated,
        args.target,
        summary.failed,
        args.out.display()
    );
    Ok(())
}
