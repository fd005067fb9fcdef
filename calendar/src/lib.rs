#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Production calendar model: a year of months, each month a set of days
//! classified as workday, shortened day, weekend or holiday.
//!
//! Raw data enters through [`ingest`], is validated into a [`YearView`] and
//! is queried through typed accessors or dotted selectors such as `"1.31"`.

pub mod day;
pub mod format;
pub mod ingest;
pub mod month;
pub mod select;
pub mod year;

use thiserror::Error;

pub use day::{DayRecord, DayType};
pub use month::{MonthView, Totals};
pub use select::{Key, Path, SelectionError};
pub use year::{Months, Selection, YearView};

/// Weekday names, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

/// Day type names, indexed by [`DayType::code`].
pub const DAY_TYPE_NAMES: [&str; 4] = ["Рабочий", "Сокращенный", "Выходной", "Праздничный"];

pub const MONTH_NAMES: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Lookup keys of months in a [`Months`] selection.
pub const MONTH_ALIASES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("Input should be a mapping")]
    NotAMapping,
    #[error("Input mapping has no keys")]
    Empty,
    #[error("Input mapping should have a single year key, got {0} keys")]
    RootKeys(usize),
    #[error("Root key {0:?} is not a 4-digit number")]
    Year(String),
    #[error("Year {0} has no months")]
    NoMonths(i32),
    #[error("Month key {0:?} is not a month number in 1..=12")]
    MonthKey(String),
    #[error("Month {0} is given more than once")]
    DuplicateMonth(u8),
    #[error("Month {0} has no days")]
    EmptyMonth(u8),
    #[error("Day key {key:?} of month {month} is not a day number")]
    DayKey { month: u8, key: String },
    #[error("Day {day} of month {month} is given more than once")]
    DuplicateDay { month: u8, day: u8 },
    #[error("Day key {key:?} of month {month} does not match day number {dnum}")]
    DayMismatch { month: u8, key: String, dnum: u8 },
    #[error("Month number {0} is not in 1..=12")]
    MonthNumber(u8),
    #[error("Year number {0} is not a 4-digit number")]
    YearNumber(i32),
    #[error("Day number {dnum} of month {month} is not in 1..=31")]
    DayNumber { month: u8, dnum: i64 },
    #[error("Weekday index {dweek} of day {month}.{day} is not in 1..=7")]
    Weekday { month: u8, day: u8, dweek: i64 },
    #[error("Day type code {dtype} of day {month}.{day} is not in 0..=3")]
    DayType { month: u8, day: u8, dtype: i64 },
}
