use std::fmt::{self, Display, Formatter};

use chrono::{NaiveDate, Weekday};
use ecow::EcoString;

use crate::{ValidationError, DAY_TYPE_NAMES, WEEKDAY_NAMES};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Classification of a calendar day.
///
/// Codes are 0 = workday, 1 = shortened (pre-holiday) workday, 2 = weekend,
/// 3 = holiday. Weekends and holidays are rest days.
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum DayType {
    Workday,
    Shortened,
    Weekend,
    Holiday,
}

impl DayType {
    pub const ALL: [DayType; 4] = [
        DayType::Workday,
        DayType::Shortened,
        DayType::Weekend,
        DayType::Holiday,
    ];

    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        DAY_TYPE_NAMES[usize::from(self.code())]
    }

    #[must_use]
    pub fn is_rest(self) -> bool {
        matches!(self, DayType::Weekend | DayType::Holiday)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DayRecord {
    day: u8,
    weekday: u8,
    day_type: DayType,
    tooltip: EcoString,
    month: u8,
    year: i32,
}

impl DayRecord {
    /// Validates the raw fields of a day of `mnum`.`ynum`.
    pub fn new(
        dnum: i64,
        dweek: i64,
        dtype: i64,
        ttip: &str,
        mnum: u8,
        ynum: i32,
    ) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&mnum) {
            return Err(ValidationError::MonthNumber(mnum));
        }
        if !(1000..=9999).contains(&ynum) {
            return Err(ValidationError::YearNumber(ynum));
        }
        let day = u8::try_from(dnum)
            .ok()
            .filter(|d| (1..=31).contains(d))
            .ok_or(ValidationError::DayNumber { month: mnum, dnum })?;
        let weekday = u8::try_from(dweek)
            .ok()
            .filter(|w| (1..=7).contains(w))
            .ok_or(ValidationError::Weekday {
                month: mnum,
                day,
                dweek,
            })?;
        let day_type = u8::try_from(dtype)
            .ok()
            .and_then(DayType::from_code)
            .ok_or(ValidationError::DayType {
                month: mnum,
                day,
                dtype,
            })?;
        Ok(Self {
            day,
            weekday,
            day_type,
            tooltip: ttip.into(),
            month: mnum,
            year: ynum,
        })
    }

    #[must_use]
    pub fn day(&self) -> u8 {
        self.day
    }

    #[must_use]
    pub fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Weekday index, Monday = 1.
    #[must_use]
    pub fn weekday_index(&self) -> u8 {
        self.weekday
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        WEEKDAYS[usize::from(self.weekday - 1)]
    }

    #[must_use]
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[usize::from(self.weekday - 1)]
    }

    #[must_use]
    pub fn day_type(&self) -> DayType {
        self.day_type
    }

    #[must_use]
    pub fn tooltip(&self) -> &str {
        self.tooltip.as_str()
    }

    /// The tooltip if there is one, the day type name otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.tooltip.is_empty() {
            self.day_type.name()
        } else {
            self.tooltip.as_str()
        }
    }

    #[must_use]
    pub fn is_rest(&self) -> bool {
        self.day_type.is_rest()
    }

    #[must_use]
    pub fn is_work(&self) -> bool {
        !self.is_rest()
    }

    /// `None` for day numbers past the end of the month.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))
    }
}

impl Display for DayRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0>2}.{:0>2} | {} {:<11} | {} {}",
            self.year,
            self.month,
            self.day,
            self.weekday,
            self.weekday_name(),
            self.day_type.code(),
            self.label()
        )
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use chrono::{NaiveDate, Weekday};

    use crate::day::{DayRecord, DayType};
    use crate::{ValidationError, DAY_TYPE_NAMES};

    fn day(dweek: i64, dtype: i64, ttip: &str) -> DayRecord {
        DayRecord::new(7, dweek, dtype, ttip, 1, 2023).unwrap()
    }

    #[test]
    fn test_weekday_names() {
        let names = (1..=7)
            .map(|w| day(w, 0, "").weekday_name())
            .collect::<HashSet<_>>();
        assert_eq!(names.len(), 7);
        assert_eq!(day(1, 0, "").weekday_name(), "Понедельник");
        assert_eq!(day(7, 0, "").weekday_name(), "Воскресенье");
        assert_eq!(day(6, 0, "").weekday(), Weekday::Sat);
    }

    #[test]
    fn test_label() {
        for code in 0..4 {
            assert_eq!(
                day(1, code, "").label(),
                DAY_TYPE_NAMES[usize::try_from(code).unwrap()]
            );
            assert_eq!(day(1, code, "Рождество").label(), "Рождество");
        }
    }

    #[test]
    fn test_rest() {
        let rest = DayType::ALL
            .iter()
            .filter(|t| t.is_rest())
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(rest, [DayType::Weekend, DayType::Holiday]);

        assert!(!day(1, 0, "").is_rest());
        assert!(!day(1, 1, "").is_rest());
        assert!(day(6, 2, "").is_rest());
        assert!(day(6, 3, "").is_rest());
        assert!(day(1, 0, "").is_work());
    }

    #[test]
    fn test_day_type_codes() {
        for t in DayType::ALL {
            assert_eq!(DayType::from_code(t.code()), Some(t));
        }
        assert_eq!(DayType::from_code(4), None);
    }

    #[test]
    fn test_invalid_fields() {
        let tests = [
            (
                DayRecord::new(7, 0, 0, "", 1, 2023),
                ValidationError::Weekday {
                    month: 1,
                    day: 7,
                    dweek: 0,
                },
            ),
            (
                DayRecord::new(7, 8, 0, "", 1, 2023),
                ValidationError::Weekday {
                    month: 1,
                    day: 7,
                    dweek: 8,
                },
            ),
            (
                DayRecord::new(7, 1, 4, "", 1, 2023),
                ValidationError::DayType {
                    month: 1,
                    day: 7,
                    dtype: 4,
                },
            ),
            (
                DayRecord::new(7, 1, -1, "", 1, 2023),
                ValidationError::DayType {
                    month: 1,
                    day: 7,
                    dtype: -1,
                },
            ),
            (
                DayRecord::new(0, 1, 0, "", 1, 2023),
                ValidationError::DayNumber { month: 1, dnum: 0 },
            ),
            (
                DayRecord::new(32, 1, 0, "", 1, 2023),
                ValidationError::DayNumber { month: 1, dnum: 32 },
            ),
            (
                DayRecord::new(7, 1, 0, "", 13, 2023),
                ValidationError::MonthNumber(13),
            ),
            (
                DayRecord::new(7, 1, 0, "", 1, 999),
                ValidationError::YearNumber(999),
            ),
        ];

        for (result, e) in tests {
            assert_eq!(result, Err(e));
        }
    }

    #[test]
    fn test_date() {
        assert_eq!(
            DayRecord::new(7, 6, 3, "", 1, 2023).unwrap().date(),
            NaiveDate::from_ymd_opt(2023, 1, 7)
        );
        assert_eq!(DayRecord::new(31, 1, 0, "", 2, 2023).unwrap().date(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DayRecord::new(7, 6, 3, "Рождество Христово", 1, 2023)
                .unwrap()
                .to_string(),
            "2023.01.07 | 6 Суббота     | 3 Рождество Христово"
        );
        assert_eq!(
            DayRecord::new(9, 1, 0, "", 1, 2023).unwrap().to_string(),
            "2023.01.09 | 1 Понедельник | 0 Рабочий"
        );
    }
}
