use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use anstyle::{AnsiColor, Color, Style};
use thiserror::Error;

use crate::{DayRecord, DayType, MonthView, Months, Totals, YearView};

const HEADER: Style = Style::new().bold();
const RULE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));
const SHORTENED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightYellow)));
const WEEKEND: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightGreen)));
const HOLIDAY: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightRed)));

const SEPARATOR: &str = " | ";

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ColumnError {
    #[error("Unknown column {0:?}, expected one of {1}")]
    Unknown(String, String),
    #[error("Invalid column width {0:?}")]
    Width(String),
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Align {
    Left,
    Right,
}

/// A column of a fixed-width table over rows of type `Row`.
pub trait Column: Copy + Sized + 'static {
    type Row: 'static;

    const ALL: &'static [Self];
    const DEFAULT: &'static [(Self, usize)];

    /// Identifier used in `column:width` lists.
    fn name(self) -> &'static str;

    fn title(self) -> &'static str;

    fn cell(self, row: &Self::Row) -> String;

    fn align(self) -> Align {
        Align::Left
    }

    fn style(_row: &Self::Row) -> Option<Style> {
        None
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum DayColumn {
    Date,
    Day,
    Weekday,
    WeekdayName,
    Type,
    Label,
    Rest,
}

impl Column for DayColumn {
    type Row = DayRecord;

    const ALL: &'static [Self] = &[
        DayColumn::Date,
        DayColumn::Day,
        DayColumn::Weekday,
        DayColumn::WeekdayName,
        DayColumn::Type,
        DayColumn::Label,
        DayColumn::Rest,
    ];
    const DEFAULT: &'static [(Self, usize)] = &[
        (DayColumn::Date, 10),
        (DayColumn::WeekdayName, 11),
        (DayColumn::Type, 3),
        (DayColumn::Label, 24),
    ];

    fn name(self) -> &'static str {
        match self {
            DayColumn::Date => "date",
            DayColumn::Day => "day",
            DayColumn::Weekday => "weekday",
            DayColumn::WeekdayName => "weekday-name",
            DayColumn::Type => "type",
            DayColumn::Label => "label",
            DayColumn::Rest => "rest",
        }
    }

    fn title(self) -> &'static str {
        match self {
            DayColumn::Date => "дата",
            DayColumn::Day => "#",
            DayColumn::Weekday => "д.н.",
            DayColumn::WeekdayName => "день недели",
            DayColumn::Type => "тип",
            DayColumn::Label => "описание",
            DayColumn::Rest => "вых.",
        }
    }

    fn cell(self, day: &DayRecord) -> String {
        match self {
            DayColumn::Date => format!("{}.{:0>2}.{:0>2}", day.year(), day.month(), day.day()),
            DayColumn::Day => format!("{:0>2}", day.day()),
            DayColumn::Weekday => day.weekday_index().to_string(),
            DayColumn::WeekdayName => day.weekday_name().to_owned(),
            DayColumn::Type => day.day_type().code().to_string(),
            DayColumn::Label => day.label().to_owned(),
            DayColumn::Rest => if day.is_rest() { "да" } else { "нет" }.to_owned(),
        }
    }

    fn align(self) -> Align {
        match self {
            DayColumn::Day => Align::Right,
            _ => Align::Left,
        }
    }

    fn style(day: &DayRecord) -> Option<Style> {
        match day.day_type() {
            DayType::Workday => None,
            DayType::Shortened => Some(SHORTENED),
            DayType::Weekend => Some(WEEKEND),
            DayType::Holiday => Some(HOLIDAY),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum MonthColumn {
    Number,
    Name,
    Days,
    Work,
    Rest,
}

impl MonthColumn {
    fn total(self, totals: Totals) -> String {
        match self {
            MonthColumn::Number | MonthColumn::Name => String::new(),
            MonthColumn::Days => totals.days.to_string(),
            MonthColumn::Work => totals.work.to_string(),
            MonthColumn::Rest => totals.rest.to_string(),
        }
    }
}

impl Column for MonthColumn {
    type Row = MonthView;

    const ALL: &'static [Self] = &[
        MonthColumn::Number,
        MonthColumn::Name,
        MonthColumn::Days,
        MonthColumn::Work,
        MonthColumn::Rest,
    ];
    const DEFAULT: &'static [(Self, usize)] = &[
        (MonthColumn::Number, 2),
        (MonthColumn::Name, 8),
        (MonthColumn::Days, 4),
        (MonthColumn::Work, 4),
        (MonthColumn::Rest, 4),
    ];

    fn name(self) -> &'static str {
        match self {
            MonthColumn::Number => "number",
            MonthColumn::Name => "name",
            MonthColumn::Days => "days",
            MonthColumn::Work => "work",
            MonthColumn::Rest => "rest",
        }
    }

    fn title(self) -> &'static str {
        match self {
            MonthColumn::Number => "#",
            MonthColumn::Name => "мес.",
            MonthColumn::Days => "дн.",
            MonthColumn::Work => "раб.",
            MonthColumn::Rest => "вых.",
        }
    }

    fn cell(self, month: &MonthView) -> String {
        match self {
            MonthColumn::Number => format!("{:0>2}", month.month()),
            MonthColumn::Name => month.name().to_owned(),
            MonthColumn::Days => month.total_days().to_string(),
            MonthColumn::Work => month.work_days().to_string(),
            MonthColumn::Rest => month.rest_days().to_string(),
        }
    }

    fn align(self) -> Align {
        match self {
            MonthColumn::Number => Align::Right,
            _ => Align::Left,
        }
    }
}

/// A column together with its padded width, parsed from `column[:width]`.
///
/// Without a width the column is as wide as its title.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct ColumnWidth<C> {
    pub column: C,
    pub width: usize,
}

impl<C: Column> FromStr for ColumnWidth<C> {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, width) = match s.split_once(':') {
            Some((name, width)) => (name.trim(), Some(width.trim())),
            None => (s.trim(), None),
        };
        let column = C::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| {
                let names = C::ALL.iter().map(|c| c.name()).collect::<Vec<_>>();
                ColumnError::Unknown(name.to_owned(), names.join(", "))
            })?;
        let width = match width {
            Some(width) => width
                .parse()
                .map_err(|_| ColumnError::Width(width.to_owned()))?,
            None => column.title().chars().count(),
        };
        Ok(Self { column, width })
    }
}

/// Which columns to render and how.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Layout<C> {
    pub columns: Vec<ColumnWidth<C>>,
    /// Character padding cells up to their width.
    pub fill: char,
    pub header: bool,
    /// Highlight rows by day type with ANSI styles.
    pub color: bool,
}

impl<C: Column> Default for Layout<C> {
    fn default() -> Self {
        Self::new(
            C::DEFAULT
                .iter()
                .map(|&(column, width)| ColumnWidth { column, width })
                .collect(),
        )
    }
}

fn write_fill(f: &mut Formatter<'_>, fill: char, count: usize) -> fmt::Result {
    (0..count).try_for_each(|_| f.write_char(fill))
}

impl<C: Column> Layout<C> {
    #[must_use]
    pub fn new(columns: Vec<ColumnWidth<C>>) -> Self {
        Self {
            columns,
            fill: ' ',
            header: true,
            color: false,
        }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn width(&self) -> usize {
        let cells = self.columns.iter().map(|c| c.width).sum::<usize>();
        cells + SEPARATOR.len() * self.columns.len().saturating_sub(1)
    }

    fn write_cell(
        &self,
        f: &mut Formatter<'_>,
        text: &str,
        width: usize,
        align: Align,
    ) -> fmt::Result {
        let padding = width.saturating_sub(text.chars().count());
        match align {
            Align::Left => {
                f.write_str(text)?;
                write_fill(f, self.fill, padding)
            }
            Align::Right => {
                write_fill(f, self.fill, padding)?;
                f.write_str(text)
            }
        }
    }

    fn write_row(
        &self,
        f: &mut Formatter<'_>,
        style: Option<Style>,
        cell: impl Fn(C) -> (String, Align),
    ) -> fmt::Result {
        let style = style.filter(|_| self.color);
        if let Some(style) = style {
            write!(f, "{}", style.render())?;
        }
        let mut first = true;
        for &ColumnWidth { column, width } in &self.columns {
            if first {
                first = false;
            } else {
                f.write_str(SEPARATOR)?;
            }
            let (text, align) = cell(column);
            self.write_cell(f, &text, width, align)?;
        }
        if let Some(style) = style {
            write!(f, "{}", style.render_reset())?;
        }
        writeln!(f)
    }

    fn write_rule(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let style = Some(RULE).filter(|_| self.color).unwrap_or_default();
        write!(f, "{}", style.render())?;
        write_fill(f, '-', self.width())?;
        writeln!(f, "{}", style.render_reset())
    }

    fn write_header(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.header {
            self.write_row(f, Some(HEADER), |c| (c.title().to_owned(), Align::Left))?;
            self.write_rule(f)?;
        }
        Ok(())
    }
}

/// Rows rendered with a [`Layout`], one line per row.
pub struct Table<'a, C: Column> {
    layout: &'a Layout<C>,
    rows: Vec<&'a C::Row>,
}

impl<'a, C: Column> Table<'a, C> {
    pub fn new(layout: &'a Layout<C>, rows: impl IntoIterator<Item = &'a C::Row>) -> Self {
        Self {
            layout,
            rows: rows.into_iter().collect(),
        }
    }
}

impl<C: Column> Display for Table<'_, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.layout.write_header(f)?;
        for row in &self.rows {
            self.layout.write_row(f, C::style(row), |column| {
                (column.cell(row), column.align())
            })?;
        }
        Ok(())
    }
}

/// Per-month counts followed by a totals row.
pub struct Summary<'a> {
    table: Table<'a, MonthColumn>,
    totals: Totals,
}

impl<'a> Summary<'a> {
    pub fn new(
        layout: &'a Layout<MonthColumn>,
        months: impl IntoIterator<Item = &'a MonthView>,
    ) -> Self {
        let table = Table::new(layout, months);
        let totals = table.rows.iter().map(|m| m.totals()).sum();
        Self { table, totals }
    }
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let layout = self.table.layout;
        write!(f, "{}", self.table)?;
        layout.write_rule(f)?;
        layout.write_row(f, None, |column| {
            (column.total(self.totals), column.align())
        })
    }
}

/// Day tables of several months, each under a title line.
pub struct MonthTables<'a> {
    layout: &'a Layout<DayColumn>,
    months: Vec<&'a MonthView>,
}

impl<'a> MonthTables<'a> {
    pub fn new(
        layout: &'a Layout<DayColumn>,
        months: impl IntoIterator<Item = &'a MonthView>,
    ) -> Self {
        Self {
            layout,
            months: months.into_iter().collect(),
        }
    }
}

impl Display for MonthTables<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for month in &self.months {
            if first {
                first = false;
            } else {
                writeln!(f)?;
            }
            writeln!(
                f,
                "{} {}: раб. {}, вых. {}, всего {}",
                month.name(),
                month.year(),
                month.work_days(),
                month.rest_days(),
                month.total_days()
            )?;
            write!(f, "{}", month.table(self.layout))?;
        }
        Ok(())
    }
}

impl MonthView {
    #[must_use]
    pub fn table<'a>(&'a self, layout: &'a Layout<DayColumn>) -> Table<'a, DayColumn> {
        Table::new(layout, self.days())
    }

    #[must_use]
    pub fn render<'a>(&'a self, layout: &'a Layout<DayColumn>) -> MonthTables<'a> {
        MonthTables::new(layout, [self])
    }
}

impl<'a> Months<'a> {
    #[must_use]
    pub fn render(&self, layout: &'a Layout<DayColumn>) -> MonthTables<'a> {
        MonthTables::new(layout, self.views())
    }

    #[must_use]
    pub fn summary(&self, layout: &'a Layout<MonthColumn>) -> Summary<'a> {
        Summary::new(layout, self.views())
    }
}

impl YearView {
    /// All months of the year in calendar order.
    #[must_use]
    pub fn render<'a>(&'a self, layout: &'a Layout<DayColumn>) -> MonthTables<'a> {
        MonthTables::new(layout, self.months())
    }

    #[must_use]
    pub fn summary<'a>(&'a self, layout: &'a Layout<MonthColumn>) -> Summary<'a> {
        Summary::new(layout, self.months())
    }
}
