use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod error;
mod intake;
mod metrics;
mod models;
mod report;
mod risk;

use error::AssessmentError;
use models::{AssessmentInput, BatchRecord, CycleRegularity, ExerciseFrequency, Symptoms};

#[derive(Parser)]
#[command(name = "pcos-risk")]
#[command(about = "Questionnaire-based PCOS risk assessment", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for single assessments
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "PCOS_RISK_FORMAT", global = true)]
    format: OutputFormat,

    /// Log scoring details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one assessment given as flags
    Assess(AssessArgs),
    /// Score one assessment read from a JSON file (`-` for stdin)
    Evaluate {
        #[arg(long)]
        input: PathBuf,
    },
    /// Score every row of a CSV file and write a markdown report
    Batch {
        #[arg(long)]
        csv: PathBuf,
        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Args, Debug)]
struct AssessArgs {
    #[arg(long, default_value_t = 25)]
    age: u32,
    #[arg(long, default_value_t = 160.0)]
    height_cm: f64,
    #[arg(long, default_value_t = 60.0)]
    weight_kg: f64,
    #[arg(long, default_value_t = 70.0)]
    waist_cm: f64,
    #[arg(long, default_value_t = 90.0)]
    hip_cm: f64,
    #[arg(long, value_enum, default_value_t = CycleRegularity::Regular)]
    cycle: CycleRegularity,
    #[arg(long, default_value_t = 5)]
    period_days: u32,
    #[arg(long, default_value_t = 7.0)]
    sleep_hours: f64,
    #[arg(long, default_value_t = 5)]
    stress: u32,
    #[arg(long, value_enum, default_value_t = ExerciseFrequency::Sedentary)]
    exercise: ExerciseFrequency,
    #[arg(long)]
    acne: bool,
    #[arg(long)]
    hair_loss: bool,
    /// Excess facial/body hair
    #[arg(long)]
    hirsutism: bool,
    #[arg(long)]
    skin_darkening: bool,
    /// Unexplained weight gain
    #[arg(long)]
    weight_gain: bool,
    #[arg(long)]
    fatigue: bool,
    #[arg(long)]
    mood_swings: bool,
    #[arg(long)]
    sleep_issues: bool,
    /// FSH in mIU/mL, 0 when not tested
    #[arg(long, default_value_t = 0.0)]
    fsh: f64,
    /// LH in mIU/mL, 0 when not tested
    #[arg(long, default_value_t = 0.0)]
    lh: f64,
    /// AMH in ng/mL, 0 when not tested
    #[arg(long, default_value_t = 0.0)]
    amh: f64,
}

impl From<AssessArgs> for AssessmentInput {
    fn from(args: AssessArgs) -> Self {
        Self {
            age: args.age,
            height_cm: args.height_cm,
            weight_kg: args.weight_kg,
            waist_cm: args.waist_cm,
            hip_cm: args.hip_cm,
            cycle_regularity: args.cycle,
            period_duration_days: args.period_days,
            sleep_hours: args.sleep_hours,
            stress_level: args.stress,
            exercise_frequency: args.exercise,
            symptoms: Symptoms {
                acne: args.acne,
                hair_loss: args.hair_loss,
                hirsutism: args.hirsutism,
                skin_darkening: args.skin_darkening,
                weight_gain: args.weight_gain,
                fatigue: args.fatigue,
                mood_swings: args.mood_swings,
                sleep_issues: args.sleep_issues,
            },
            fsh: args.fsh,
            lh: args.lh,
            amh: args.amh,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "pcos_risk=debug" } else { "pcos_risk=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn assess_and_print(input: &AssessmentInput, format: OutputFormat) -> anyhow::Result<()> {
    intake::validate(input)?;
    let result = risk::compute_assessment(input);

    let rendered = match format {
        OutputFormat::Text => report::render_text(&result),
        OutputFormat::Markdown => report::render_markdown(&result),
        OutputFormat::Json => {
            report::render_json(&result).context("failed to serialize assessment result")?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// A batch in which no row could be scored counts as rejected input.
fn batch_outcome(records: &[BatchRecord]) -> Result<(), AssessmentError> {
    if !records.is_empty() && records.iter().all(|record| record.outcome.is_err()) {
        return Err(AssessmentError::invalid(
            "csv",
            format!("all {} rows were rejected", records.len()),
        ));
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Assess(args) => {
            let input = AssessmentInput::from(args);
            assess_and_print(&input, cli.format)?;
        }
        Commands::Evaluate { input } => {
            let assessment = intake::load_json(&input)
                .with_context(|| format!("could not load {}", input.display()))?;
            assess_and_print(&assessment, cli.format)?;
        }
        Commands::Batch { csv, out, limit } => {
            let records = intake::assess_csv(&csv)?;
            let outcome = batch_outcome(&records);
            let report = report::build_batch_report(
                &csv.display().to_string(),
                chrono::Utc::now().date_naive(),
                &records,
                limit,
            );

            match out {
                Some(path) => {
                    std::fs::write(&path, report)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Report written to {}.", path.display());
                }
                None => print!("{report}"),
            }
            outcome?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            err.downcast_ref::<AssessmentError>()
                .map(AssessmentError::exit_code)
                .unwrap_or(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assess_defaults_match_questionnaire_defaults() {
        let cli = Cli::try_parse_from(["pcos-risk", "assess"]).unwrap();
        let Commands::Assess(args) = cli.command else {
            panic!("expected assess command");
        };
        assert_eq!(AssessmentInput::from(args), AssessmentInput::default());
    }

    #[test]
    fn assess_flags_populate_input() {
        let cli = Cli::try_parse_from([
            "pcos-risk",
            "--format",
            "json",
            "assess",
            "--age",
            "30",
            "--cycle",
            "irregular",
            "--exercise",
            "moderate",
            "--hirsutism",
            "--fsh",
            "5",
            "--lh",
            "8",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        let Commands::Assess(args) = cli.command else {
            panic!("expected assess command");
        };

        let input = AssessmentInput::from(args);
        assert_eq!(input.age, 30);
        assert_eq!(input.cycle_regularity, CycleRegularity::Irregular);
        assert_eq!(input.exercise_frequency, ExerciseFrequency::Moderate);
        assert!(input.symptoms.hirsutism);
        assert_eq!(input.symptoms.count(), 1);
        assert_eq!(input.lh, 8.0);
    }

    #[test]
    fn unknown_category_is_rejected_by_parser() {
        let parsed = Cli::try_parse_from(["pcos-risk", "assess", "--exercise", "daily"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn rejected_input_surfaces_exit_code() {
        let input = AssessmentInput {
            hip_cm: 0.0,
            ..AssessmentInput::default()
        };
        let err = assess_and_print(&input, OutputFormat::Text).unwrap_err();
        let code = err
            .downcast_ref::<AssessmentError>()
            .map(AssessmentError::exit_code);
        assert_eq!(code, Some(ExitCode::from(2)));
    }

    #[test]
    fn batch_with_only_rejected_rows_fails() {
        let rejected = |row| BatchRecord {
            row,
            label: None,
            outcome: Err("Invalid input: hip_cm must be greater than zero".to_string()),
        };
        let err = batch_outcome(&[rejected(1), rejected(2)]).unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::from(2));

        let scored = BatchRecord {
            row: 3,
            label: None,
            outcome: Ok(risk::compute_assessment(&AssessmentInput::default())),
        };
        assert!(batch_outcome(&[rejected(1), scored]).is_ok());
        assert!(batch_outcome(&[]).is_ok());
    }
}
