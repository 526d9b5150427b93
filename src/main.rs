mod decision;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod scaler;
mod schema;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::input::InputError;
use crate::input::forms::{FormKind, SIMPLIFIED_FIELDS, assemble, raw_value_from_arg};
use crate::input::presets::Preset;
use crate::pipeline::batch::{assess_batch, default_workers};
use crate::pipeline::{PipelineError, ScoringPipeline, SelfCheck};
use crate::report::ReportContext;
use crate::report::json::{render_batch_json, render_verdict_json};
use crate::report::text::{render_batch_text, render_verdict_text};
use crate::scaler::Scaler;
use crate::schema::{Feature, RawInputs};

#[derive(Debug, Parser)]
#[command(
    name = "lifepulse",
    version,
    about = "Heart-disease risk scoring: pre-trained classifier plus clinical rule checks"
)]
struct Cli {
    /// Classifier artifact (JSON, optionally gzip-compressed).
    #[arg(
        long,
        env = "LIFEPULSE_MODEL",
        default_value = "models/heart_disease_model.json",
        global = true
    )]
    model: PathBuf,

    /// Scaler artifact (JSON, optionally gzip-compressed).
    #[arg(
        long,
        env = "LIFEPULSE_SCALER",
        default_value = "models/scaler.json",
        global = true
    )]
    scaler: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Debug-level logging (overridden by LIFEPULSE_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one patient.
    Score(ScoreArgs),
    /// Score every record of a JSON array or newline-delimited JSON file.
    Batch {
        path: PathBuf,
        /// Worker threads (defaults to available parallelism).
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Load the artifacts and run the startup self-check only.
    Check,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// JSON object with the named measurements.
    #[arg(long, conflicts_with = "preset")]
    input: Option<PathBuf>,

    /// Quick-load a demo patient.
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Patient form: fields it does not ask for get healthy defaults.
    #[arg(long)]
    simplified: bool,

    #[command(flatten)]
    fields: FieldArgs,
}

/// Individual measurements; applied on top of `--input` or `--preset`.
#[derive(Debug, Default, Args)]
struct FieldArgs {
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    sex: Option<String>,
    #[arg(long)]
    cp: Option<String>,
    #[arg(long)]
    trestbps: Option<String>,
    #[arg(long)]
    chol: Option<String>,
    #[arg(long)]
    fbs: Option<String>,
    #[arg(long)]
    restecg: Option<String>,
    #[arg(long)]
    thalach: Option<String>,
    #[arg(long)]
    exang: Option<String>,
    #[arg(long)]
    oldpeak: Option<String>,
    #[arg(long)]
    slope: Option<String>,
    #[arg(long)]
    ca: Option<String>,
    #[arg(long)]
    thal: Option<String>,
}

impl FieldArgs {
    fn supplied(&self) -> Vec<(Feature, &str)> {
        [
            (Feature::Age, &self.age),
            (Feature::Sex, &self.sex),
            (Feature::Cp, &self.cp),
            (Feature::Trestbps, &self.trestbps),
            (Feature::Chol, &self.chol),
            (Feature::Fbs, &self.fbs),
            (Feature::Restecg, &self.restecg),
            (Feature::Thalach, &self.thalach),
            (Feature::Exang, &self.exang),
            (Feature::Oldpeak, &self.oldpeak),
            (Feature::Slope, &self.slope),
            (Feature::Ca, &self.ca),
            (Feature::Thal, &self.thal),
        ]
        .into_iter()
        .filter_map(|(f, v)| v.as_deref().map(|v| (f, v)))
        .collect()
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("cannot render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// 1 for bad patient input, 2 when the artifacts cannot be trusted.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Input(_) => 1,
            CliError::Pipeline(e) if e.is_input_error() => 1,
            CliError::Pipeline(_) | CliError::Render(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let pipeline = ScoringPipeline::load(&cli.model, &cli.scaler)?;
    let ctx = ReportContext {
        model_id: pipeline.model().id().to_string(),
        model_version: pipeline.model().version().to_string(),
    };

    match &cli.command {
        Command::Check => {
            for feature in Scaler::fit_columns() {
                if let Some(p) = pipeline.scaler().params(*feature) {
                    tracing::info!(
                        column = feature.name(),
                        mean = p.mean,
                        scale = p.scale,
                        "scaler column"
                    );
                }
            }
            println!("{}", render_check(pipeline.self_check(), &ctx, cli.format)?);
        }
        Command::Score(args) => {
            let raw = assemble_raw(args)?;
            let verdict = pipeline.assess(&raw)?;
            match cli.format {
                OutputFormat::Text => print!("{}", render_verdict_text(&verdict, &ctx)),
                OutputFormat::Json => println!("{}", render_verdict_json(&verdict, &ctx)?),
            }
        }
        Command::Batch { path, workers } => {
            let records = input::load_batch(path)?;
            let workers = workers.unwrap_or_else(default_workers);
            tracing::info!(records = records.len(), workers, "scoring batch");
            let results = assess_batch(&pipeline, &records, workers);
            match cli.format {
                OutputFormat::Text => print!("{}", render_batch_text(&results, &ctx)),
                OutputFormat::Json => println!("{}", render_batch_json(&results, &ctx)?),
            }
        }
    }
    Ok(())
}

fn assemble_raw(args: &ScoreArgs) -> Result<RawInputs, CliError> {
    let mut raw = match (&args.input, args.preset) {
        (Some(path), _) => input::load_raw_inputs(path)?,
        (None, Some(preset)) => {
            tracing::info!(preset = preset.name(), "quick-load preset");
            preset.raw_inputs()
        }
        (None, None) => RawInputs::new(),
    };

    let kind = if args.simplified {
        FormKind::Simplified
    } else {
        FormKind::Full
    };

    for (feature, value) in args.fields.supplied() {
        if kind == FormKind::Simplified && !SIMPLIFIED_FIELDS.contains(&feature) {
            tracing::warn!(
                field = feature.name(),
                "field is not part of the simplified form; supplied value kept"
            );
        }
        raw.insert(feature.name().to_string(), raw_value_from_arg(value));
    }

    Ok(assemble(kind, raw))
}

fn render_check(
    check: SelfCheck,
    ctx: &ReportContext,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    let (status, probability) = match check {
        SelfCheck::Verified { probability } => ("verified", probability),
        SelfCheck::Unsigned { probability } => ("unsigned", probability),
    };
    match format {
        OutputFormat::Text => Ok(format!(
            "artifacts ok: model {} self-check {status} (reference probability {probability:.6})",
            ctx.model_id
        )),
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "model_id": ctx.model_id,
            "model_version": ctx.model_version,
            "self_check": status,
            "reference_probability": probability,
        })),
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
