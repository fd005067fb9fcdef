#![warn(clippy::pedantic)]

mod logging;

use std::io::{BufReader, Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use calendar::format::{Column, ColumnWidth, DayColumn, Layout, MonthColumn};
use calendar::{Selection, SelectionError, YearView, ingest};
use clap::{ArgAction, Parser};
use fs_err::File;
use thiserror::Error;
use tracing::info;

/// Shows production calendar data: work, shortened, weekend and holiday days.
#[derive(Debug, Parser)]
#[command(version)]
struct Command {
    /// Calendar data as JSON, defaults to `calendar.json`
    #[arg(default_value = "calendar.json")]
    path: PathBuf,

    /// Months to show, in the given order, defaults to every month in the file
    #[arg(short, long, value_delimiter = ',')]
    months: Vec<u32>,

    /// Show a single month or day, e.g. `1` or `1.31`
    #[arg(short, long, conflicts_with_all = ["months", "summary"])]
    select: Option<String>,

    /// Show day counts per month instead of day tables
    #[arg(long)]
    summary: bool,

    /// Day table columns as `column:width`, e.g. `date:10,label:24`
    #[arg(long, value_delimiter = ',')]
    columns: Vec<ColumnWidth<DayColumn>>,

    /// Character padding table cells
    #[arg(long, default_value_t = ' ')]
    fill: char,

    /// Omit table headers
    #[arg(long)]
    no_header: bool,

    /// Highlight shortened days, weekends and holidays
    #[arg(long)]
    color: bool,

    /// Whether to only check the input
    #[arg(long)]
    check: bool,

    /// Log more, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Error, Debug)]
enum Error {
    #[error("Failed to read input file: {0}")]
    InputFile(std::io::Error),
    #[error("Failed to load calendar: {0}")]
    Load(#[from] ingest::Error),
    #[error("Invalid month selection: {0}")]
    Select(#[from] SelectionError),
    #[error("Nothing found for selector {0:?}")]
    NotFound(String),
    #[error(transparent)]
    Output(#[from] anyhow::Error),
}

fn layout<C: Column>(
    columns: Vec<ColumnWidth<C>>,
    fill: char,
    header: bool,
    color: bool,
) -> Layout<C> {
    let layout = if columns.is_empty() {
        Layout::default()
    } else {
        Layout::new(columns)
    };
    layout.with_fill(fill).with_header(header).with_color(color)
}

fn run(
    Command {
        path,
        months,
        select,
        summary,
        columns,
        fill,
        no_header,
        color,
        check,
        verbose: _,
    }: Command,
) -> Result<(), Error> {
    let file = File::open(&path).map_err(Error::InputFile)?;
    let year = ingest::load(BufReader::new(file))?;
    info!(
        year = year.year(),
        months = year.months().len(),
        "Loaded calendar from {}",
        path.display()
    );
    if check {
        return Ok(());
    }

    let mut out = stdout().lock();
    let days = layout(columns, fill, !no_header, color);
    if let Some(selector) = select {
        let selection = year
            .select(&selector)
            .ok_or_else(|| Error::NotFound(selector))?;
        let written = match selection {
            Selection::Month(month) => write!(out, "{}", month.render(&days)),
            Selection::Day(day) => writeln!(out, "{day}"),
        };
        written.context("Failed to write selection")?;
        return Ok(());
    }

    let counts = summary.then(|| layout::<MonthColumn>(Vec::new(), fill, !no_header, color));
    write_months(&mut out, &year, &months, &days, counts.as_ref())
}

/// Writes the requested months, or every month the calendar has when none
/// are requested. With `counts` only the per-month counts are written.
fn write_months(
    out: &mut impl Write,
    year: &YearView,
    months: &[u32],
    days: &Layout<DayColumn>,
    counts: Option<&Layout<MonthColumn>>,
) -> Result<(), Error> {
    let written = if months.is_empty() {
        match counts {
            Some(counts) => write!(out, "{}", year.summary(counts)),
            None => write!(out, "{}", year.render(days)),
        }
    } else {
        let selected = year.select_months(months)?;
        let aliases = selected.aliases().collect::<Vec<_>>();
        info!(?aliases, "Selected months");
        match counts {
            Some(counts) => write!(out, "{}", selected.summary(counts)),
            None => write!(out, "{}", selected.render(days)),
        }
    };
    written.context("Failed to write months")?;
    Ok(())
}

fn main() -> ExitCode {
    let command = Command::parse();
    logging::init(command.verbose);
    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
