//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use dash_model::DatasetKind;

#[derive(Parser)]
#[command(
    name = "econdash",
    version,
    about = "Economic dashboard engine - filter, chart and animate state-level datasets",
    long_about = "Load the dashboard datasets, drive the linked controls from the command line\n\
                  and print what each panel would draw."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the option list a control would show for a field.
    Options(OptionsArgs),

    /// Run the state indicator line chart for one selection.
    Chart(ChartArgs),

    /// Run a two-panel income comparison for one year.
    Compare(CompareArgs),

    /// Join a dataset onto the US states map and print fills and legend.
    Map(MapArgs),

    /// Play the GSP animation in real time.
    Animate(AnimateArgs),

    /// Load every section from a TOML config and report readiness.
    Dashboard(DashboardArgs),
}

#[derive(Parser)]
pub struct OptionsArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Dataset schema used to type the file.
    #[arg(long = "schema", value_enum)]
    pub schema: SchemaArg,

    /// Field whose distinct values are listed.
    #[arg(long = "field")]
    pub field: String,

    /// Restrict to records where FIELD=VALUE (dependent options).
    #[arg(long = "when", value_name = "FIELD=VALUE", value_parser = parse_condition)]
    pub when: Option<(String, String)>,
}

#[derive(Parser)]
pub struct ChartArgs {
    /// State indicators CSV.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Metric to plot (defaults to the first metric in the file).
    #[arg(long = "variable")]
    pub variable: Option<String>,

    /// Percentile of the metric (defaults to the metric's first percentile).
    #[arg(long = "percentile")]
    pub percentile: Option<String>,

    /// States to include; repeat for several. None selected plots nothing.
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    /// Also print the SVG path of every series.
    #[arg(long = "paths")]
    pub paths: bool,
}

#[derive(Parser)]
pub struct CompareArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(long = "schema", value_enum, default_value = "household")]
    pub schema: ComparisonArg,

    /// Census year (defaults to the first year in the file).
    #[arg(long = "year")]
    pub year: Option<String>,

    /// Category for the first panel.
    #[arg(long = "option-1")]
    pub option_1: Option<String>,

    /// Category for the second panel.
    #[arg(long = "option-2")]
    pub option_2: Option<String>,

    /// Plot every category in the first panel.
    #[arg(long = "plot-all", conflicts_with_all = ["option_1", "option_2"])]
    pub plot_all: bool,
}

#[derive(Parser)]
pub struct MapArgs {
    /// US states GeoJSON feature collection.
    #[arg(value_name = "GEOJSON")]
    pub geojson: PathBuf,

    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[arg(long = "schema", value_enum)]
    pub schema: MapArg,

    /// Print the tooltip for this state.
    #[arg(long = "hover", value_name = "STATE")]
    pub hover: Option<String>,
}

#[derive(Parser)]
pub struct AnimateArgs {
    /// GSP CSV.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Milliseconds between frames.
    #[arg(long = "interval-ms", default_value_t = 500)]
    pub interval_ms: u64,

    /// Years advanced per frame.
    #[arg(long = "step", default_value_t = 1.0)]
    pub step: f64,
}

#[derive(Parser)]
pub struct DashboardArgs {
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemaArg {
    StateIndicators,
    Household,
    Age,
    Unemployment,
    Employment,
    Gsp,
}

impl SchemaArg {
    pub fn kind(self) -> DatasetKind {
        match self {
            Self::StateIndicators => DatasetKind::StateIndicators,
            Self::Household => DatasetKind::HouseholdIncome,
            Self::Age => DatasetKind::AgeIncome,
            Self::Unemployment => DatasetKind::Unemployment,
            Self::Employment => DatasetKind::Employment,
            Self::Gsp => DatasetKind::Gsp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ComparisonArg {
    Household,
    Age,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MapArg {
    Unemployment,
    Employment,
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

fn parse_condition(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}
