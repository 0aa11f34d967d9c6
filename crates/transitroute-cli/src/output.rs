//! Output formatting and argument enums shared by the CLI subcommands.

use std::fmt;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use transitroute_lib::{RouteAlgorithm, RouteRenderMode, RouteSummary, WeightFunction};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing with node coordinates.
    #[default]
    Text,
    /// One line per route: cost and node ids.
    Compact,
    /// Pretty-printed JSON document.
    Json,
}

impl OutputFormat {
    /// Write a route summary in this format.
    pub fn render_route(self, summary: &RouteSummary) -> io::Result<()> {
        match self {
            OutputFormat::Text => print_text(&summary.render(RouteRenderMode::PlainText)),
            OutputFormat::Compact => print_text(&summary.render(RouteRenderMode::Compact)),
            OutputFormat::Json => render_json(summary),
        }
    }
}

/// Edge attribute minimised by the `route` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WeightArg {
    #[default]
    TravelTime,
    Length,
    CombinedWeight,
}

impl From<WeightArg> for WeightFunction {
    fn from(value: WeightArg) -> Self {
        match value {
            WeightArg::TravelTime => WeightFunction::TravelTime,
            WeightArg::Length => WeightFunction::Length,
            WeightArg::CombinedWeight => WeightFunction::CombinedWeight,
        }
    }
}

impl fmt::Display for WeightArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&WeightFunction::from(*self), f)
    }
}

/// Search algorithm selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AlgorithmArg {
    #[default]
    AStar,
    Dijkstra,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
        }
    }
}

fn print_text(rendered: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()
}

/// Write any serialisable value as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
