//! Input boundary: the JSON shapes produced by calendar scrapers.
//!
//! Two shapes exist. The compact one maps day numbers straight to
//! `{dnum, dweek, dtype, ttip}` records using the canonical [`DayType`]
//! codes. The detailed one wraps the days of a month together with its
//! name and precomputed counts, and numbers day types differently
//! (0 = workday, 1 = weekend, 2 = shortened, 3 = day off). Both are
//! normalized to [`RawDay`] here; embedded counts are only checked against
//! the recomputed ones. A month with a `days` field is a detailed one.

use std::collections::BTreeMap;
use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::{DayType, MonthView, Totals, ValidationError, YearView};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read calendar data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed month {month}: {source}")]
    Month {
        month: String,
        source: serde_json::Error,
    },
    #[error("Malformed day {day} of month {month}: {source}")]
    Day {
        month: String,
        day: String,
        source: serde_json::Error,
    },
    #[error("Invalid calendar data: {0}")]
    Invalid(#[from] ValidationError),
}

/// Raw fields of a day. Month and year are supplied by the owning month.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct RawDay {
    pub dnum: i64,
    pub dweek: i64,
    pub dtype: i64,
    #[serde(default)]
    pub ttip: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct DetailedDay {
    pub day_num: i64,
    pub wday_num: i64,
    #[serde(default)]
    pub wday_str: String,
    pub dtype_num: i64,
    #[serde(default)]
    pub dtype_str: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
pub struct DetailedMonth {
    #[serde(default)]
    pub name: String,
    #[serde(alias = "total")]
    pub countdays: Option<usize>,
    pub workdays: Option<usize>,
    pub restdays: Option<usize>,
    #[serde(skip)]
    pub days: BTreeMap<String, DetailedDay>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RawMonth {
    Detailed(DetailedMonth),
    Compact(BTreeMap<String, RawDay>),
}

impl RawMonth {
    /// Reads the month stored under `key`, reporting malformed days by key.
    pub fn from_value(key: &str, value: Value) -> Result<Self, Error> {
        let month_error = |source| Error::Month {
            month: key.to_owned(),
            source,
        };
        let mut fields: Map<String, Value> = serde_json::from_value(value).map_err(month_error)?;
        match fields.remove("days") {
            Some(days) => {
                let days = parse_days(key, days)?;
                let month: DetailedMonth =
                    serde_json::from_value(Value::Object(fields)).map_err(month_error)?;
                Ok(Self::Detailed(DetailedMonth { days, ..month }))
            }
            None => Ok(Self::Compact(parse_days(key, Value::Object(fields))?)),
        }
    }
}

fn parse_days<T: DeserializeOwned>(
    month: &str,
    days: Value,
) -> Result<BTreeMap<String, T>, Error> {
    let days: Map<String, Value> =
        serde_json::from_value(days).map_err(|source| Error::Month {
            month: month.to_owned(),
            source,
        })?;
    days.into_iter()
        .map(|(day, value)| match serde_json::from_value(value) {
            Ok(parsed) => Ok((day, parsed)),
            Err(source) => Err(Error::Day {
                month: month.to_owned(),
                day,
                source,
            }),
        })
        .collect()
}

pub type RawYear = BTreeMap<String, RawMonth>;

/// The whole input: a single year key mapping month keys to months.
pub type RawCalendar = BTreeMap<String, RawYear>;

/// Stock descriptions of the detailed shape, indexed by its day type codes.
const DETAILED_LABELS: [&str; 4] = [
    "Рабочий день",
    "Выходной день",
    "Сокращенный день",
    "Праздничный день",
];

const DAY_OFF: [&str; 2] = ["Выходной", "Выходной день"];

impl DetailedDay {
    fn day_type(&self) -> Option<DayType> {
        match self.dtype_num {
            0 => Some(DayType::Workday),
            1 => Some(DayType::Weekend),
            2 => Some(DayType::Shortened),
            3 if matches!(self.wday_num, 6 | 7) && DAY_OFF.contains(&self.dtype_str.trim()) => {
                Some(DayType::Weekend)
            }
            3 => Some(DayType::Holiday),
            _ => None,
        }
    }

    fn into_raw(self) -> RawDay {
        let stock = usize::try_from(self.dtype_num)
            .ok()
            .and_then(|code| DETAILED_LABELS.get(code))
            .is_some_and(|label| *label == self.dtype_str.trim());
        let ttip = if stock {
            String::new()
        } else {
            self.dtype_str.trim().to_owned()
        };
        RawDay {
            dnum: self.day_num,
            dweek: self.wday_num,
            // Unknown codes are passed through for `DayRecord` to reject.
            dtype: self
                .day_type()
                .map_or(self.dtype_num, |t| i64::from(t.code())),
            ttip,
        }
    }
}

/// Counts a detailed month claims for itself, any of them may be left out.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Declared {
    pub days: Option<usize>,
    pub work: Option<usize>,
    pub rest: Option<usize>,
}

impl Declared {
    /// Names of the present counts that differ from `computed`.
    fn mismatches(&self, computed: Totals) -> Vec<&'static str> {
        [
            ("days", self.days, computed.days),
            ("work", self.work, computed.work),
            ("rest", self.rest, computed.rest),
        ]
        .into_iter()
        .filter(|&(_, declared, computed)| declared.is_some_and(|d| d != computed))
        .map(|(name, ..)| name)
        .collect()
    }
}

/// A month's days in the compact shape, plus the counts the input claims.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthData {
    pub days: BTreeMap<String, RawDay>,
    pub declared: Declared,
}

impl From<RawMonth> for MonthData {
    fn from(month: RawMonth) -> Self {
        match month {
            RawMonth::Compact(days) => Self {
                days,
                declared: Declared::default(),
            },
            RawMonth::Detailed(DetailedMonth {
                countdays,
                workdays,
                restdays,
                days,
                ..
            }) => Self {
                days: days
                    .into_iter()
                    .map(|(key, day)| (key, day.into_raw()))
                    .collect(),
                declared: Declared {
                    days: countdays,
                    work: workdays,
                    rest: restdays,
                },
            },
        }
    }
}

impl MonthData {
    pub fn build(&self, year: i32, month: u8) -> Result<MonthView, ValidationError> {
        let view = MonthView::new(year, month, &self.days)?;
        let mismatched = self.declared.mismatches(view.totals());
        if !mismatched.is_empty() {
            warn!(
                year,
                month,
                ?mismatched,
                declared = ?self.declared,
                computed = ?view.totals(),
                "Embedded month counts disagree with the days, using the computed ones"
            );
        }
        Ok(view)
    }
}

pub fn load_value(value: Value) -> Result<YearView, Error> {
    match &value {
        Value::Object(map) if map.is_empty() => return Err(ValidationError::Empty.into()),
        Value::Object(_) => {}
        _ => return Err(ValidationError::NotAMapping.into()),
    }
    let raw: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_value(value)?;
    let raw = raw
        .into_iter()
        .map(|(year, months)| {
            let months = months
                .into_iter()
                .map(|(key, month)| RawMonth::from_value(&key, month).map(|month| (key, month)))
                .collect::<Result<RawYear, _>>()?;
            Ok::<_, Error>((year, months))
        })
        .collect::<Result<RawCalendar, Error>>()?;
    Ok(YearView::new(raw)?)
}

pub fn load_str(s: &str) -> Result<YearView, Error> {
    load_value(serde_json::from_str(s)?)
}

pub fn load(r: impl Read) -> Result<YearView, Error> {
    load_value(serde_json::from_reader(r)?)
}
