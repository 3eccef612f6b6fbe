//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use nutri_cli::logging::LogFormat;
use nutri_energy::{ActivityLevel, Equation, LactationType, Objective, Sex};
use nutri_model::SourceTag;
use nutri_output::SortField;

#[derive(Parser)]
#[command(
    name = "nutri",
    version,
    about = "Food composition pipeline and energy calculator",
    long_about = "Normalize the TACO and IBGE food composition tables into one canonical \
                  dataset, query it, and compute energy and macronutrient targets.\n\n\
                  Every column mapping is verified against published reference rows \
                  before a batch is imported."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log anthropometric values instead of redacting them.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the import pipeline described by a TOML configuration.
    Run(RunArgs),

    /// Print the quality report and plausibility issues of a canonical dataset.
    Report(ReportArgs),

    /// Search a canonical dataset.
    Search(SearchArgs),

    /// Compute BMR, energy expenditure and macronutrient targets.
    Energy(EnergyArgs),

    /// List supported sources and their built-in mappings.
    Sources(SourcesArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Replace the dataset even if coverage dropped beyond tolerance.
    ///
    /// By default the previous canonical dataset is kept when any coverage
    /// percentage (macronutrients, minerals, vitamins, all three) falls by
    /// more than `coverage_tolerance`. The override is logged and recorded in
    /// the run report.
    ///
    /// WARNING: A coverage drop usually means a source layout changed.
    #[arg(long = "accept-coverage-regression")]
    pub accept_coverage_regression: bool,

    /// Replace the dataset even if error-severity plausibility issues exist.
    ///
    /// WARNING: Errors include negative values and source codes found in
    /// nutrient columns.
    #[arg(long = "allow-validation-errors")]
    pub allow_validation_errors: bool,

    /// Accept column mappings that carry no reference row.
    ///
    /// A mapping whose reference rows do not match is still rejected.
    #[arg(long = "allow-unverified-mappings")]
    pub allow_unverified_mappings: bool,

    /// Date written as `lastUpdated` (default: configuration, then today UTC).
    #[arg(long = "last-updated", value_name = "YYYY-MM-DD")]
    pub last_updated: Option<NaiveDate>,

    /// Run every stage and report without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Canonical dataset file.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Canonical dataset file.
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Text matched against name, category and tags, ignoring accents and case.
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Only records of this category code.
    #[arg(long = "category")]
    pub category: Option<String>,

    /// Only records of this source.
    #[arg(long = "source", value_enum)]
    pub source: Option<SourceArg>,

    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,

    /// Page size (at most 200).
    #[arg(long = "limit", default_value_t = nutri_output::DEFAULT_LIMIT)]
    pub limit: usize,

    #[arg(long = "sort", value_enum, default_value = "name")]
    pub sort: SortArg,

    /// Sort in descending order.
    #[arg(long = "desc")]
    pub desc: bool,

    /// Print the page as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct EnergyArgs {
    /// Body weight in kilograms.
    #[arg(long = "weight", value_name = "KG")]
    pub weight: f64,

    /// Height in centimeters.
    #[arg(long = "height", value_name = "CM")]
    pub height: f64,

    /// Age in years.
    #[arg(long = "age", value_name = "YEARS")]
    pub age: f64,

    #[arg(long = "sex", value_enum)]
    pub sex: SexArg,

    /// Body fat percentage; enables Katch-McArdle.
    #[arg(long = "body-fat", value_name = "PCT")]
    pub body_fat: Option<f64>,

    /// Lean body mass in kilograms; takes precedence over --body-fat.
    #[arg(long = "lean-mass", value_name = "KG")]
    pub lean_mass: Option<f64>,

    #[arg(long = "equation", value_enum, default_value = "mifflin-st-jeor")]
    pub equation: EquationArg,

    #[arg(long = "activity", value_enum, default_value = "sedentary")]
    pub activity: ActivityArg,

    #[arg(long = "objective", value_enum, default_value = "maintenance")]
    pub objective: ObjectiveArg,

    /// Carbohydrate share of the calorie target, in percent.
    #[arg(long = "carb", default_value_t = 50.0)]
    pub carb: f64,

    /// Protein share of the calorie target, in percent.
    #[arg(long = "protein", default_value_t = 20.0)]
    pub protein: f64,

    /// Fat share of the calorie target, in percent.
    #[arg(long = "fat", default_value_t = 30.0)]
    pub fat: f64,

    /// Pregnancy trimester (1-3).
    #[arg(long = "trimester", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub trimester: Option<u8>,

    #[arg(long = "lactation", value_enum)]
    pub lactation: Option<LactationArg>,

    /// Hypothyroidism (BMR x0.9).
    #[arg(long = "thyroid")]
    pub thyroid: bool,

    /// Metabolic disorder (BMR x0.95).
    #[arg(long = "metabolic-disorder")]
    pub metabolic_disorder: bool,

    /// Print the plan as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct SourcesArgs {
    /// Write the built-in mappings to this directory as a mapping repository.
    #[arg(long = "export", value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// List the mapping files stored in this directory.
    #[arg(long = "list", value_name = "DIR", conflicts_with = "export")]
    pub list: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Taco,
    Ibge,
}

impl From<SourceArg> for SourceTag {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Taco => SourceTag::Taco,
            SourceArg::Ibge => SourceTag::Ibge,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Id,
    Energy,
    Protein,
    Lipids,
    Carbohydrate,
}

impl From<SortArg> for SortField {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Name => SortField::Name,
            SortArg::Id => SortField::Id,
            SortArg::Energy => SortField::Energy,
            SortArg::Protein => SortField::Protein,
            SortArg::Lipids => SortField::Lipids,
            SortArg::Carbohydrate => SortField::Carbohydrate,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(value: SexArg) -> Self {
        match value {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EquationArg {
    MifflinStJeor,
    HarrisBenedictOriginal,
    HarrisBenedictRevised,
    KatchMcardle,
}

impl From<EquationArg> for Equation {
    fn from(value: EquationArg) -> Self {
        match value {
            EquationArg::MifflinStJeor => Equation::MifflinStJeor,
            EquationArg::HarrisBenedictOriginal => Equation::HarrisBenedictOriginal,
            EquationArg::HarrisBenedictRevised => Equation::HarrisBenedictRevised,
            EquationArg::KatchMcardle => Equation::KatchMcArdle,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ActivityArg {
    Sedentary,
    Light,
    Moderate,
    Intense,
    Extreme,
}

impl From<ActivityArg> for ActivityLevel {
    fn from(value: ActivityArg) -> Self {
        match value {
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
            ActivityArg::Light => ActivityLevel::Light,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::Intense => ActivityLevel::Intense,
            ActivityArg::Extreme => ActivityLevel::Extreme,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ObjectiveArg {
    WeightLoss,
    Maintenance,
    WeightGain,
    MuscleGain,
}

impl From<ObjectiveArg> for Objective {
    fn from(value: ObjectiveArg) -> Self {
        match value {
            ObjectiveArg::WeightLoss => Objective::WeightLoss,
            ObjectiveArg::Maintenance => Objective::Maintenance,
            ObjectiveArg::WeightGain => Objective::WeightGain,
            ObjectiveArg::MuscleGain => Objective::MuscleGain,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LactationArg {
    Exclusive,
    Partial,
}

impl From<LactationArg> for LactationType {
    fn from(value: LactationArg) -> Self {
        match value {
            LactationArg::Exclusive => LactationType::Exclusive,
            LactationArg::Partial => LactationType::Partial,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
