use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use derive_more::{Add, AddAssign, Sum};
use tracing::debug;

use crate::ingest::RawDay;
use crate::select::Key;
use crate::{DayRecord, ValidationError, MONTH_ALIASES, MONTH_NAMES};

/// Day counts of one or more months. `work + rest == days` always holds.
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone, Add, AddAssign, Sum)]
pub struct Totals {
    pub days: usize,
    pub work: usize,
    pub rest: usize,
}

impl Totals {
    fn of<'a>(days: impl IntoIterator<Item = &'a DayRecord>) -> Self {
        let (days, rest) = days
            .into_iter()
            .fold((0, 0), |(days, rest), day| {
                (days + 1, rest + usize::from(day.is_rest()))
            });
        Self {
            days,
            work: days - rest,
            rest,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthView {
    year: i32,
    month: u8,
    days: BTreeMap<u8, DayRecord>,
    totals: Totals,
}

impl MonthView {
    /// Builds one [`DayRecord`] per entry of `raw`, stopping at the first invalid one.
    ///
    /// Keys may be numbers or numeric text but must name the day number of
    /// their record, and no two keys may name the same day.
    pub fn new<'a, K>(
        year: i32,
        month: u8,
        raw: impl IntoIterator<Item = (&'a K, &'a RawDay)>,
    ) -> Result<Self, ValidationError>
    where
        K: Key + Display + 'a,
    {
        let mut days = BTreeMap::new();
        for (key, fields) in raw {
            let number = key
                .number()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| ValidationError::DayKey {
                    month,
                    key: key.to_string(),
                })?;
            let record = DayRecord::new(
                fields.dnum,
                fields.dweek,
                fields.dtype,
                &fields.ttip,
                month,
                year,
            )?;
            if record.day() != number {
                return Err(ValidationError::DayMismatch {
                    month,
                    key: key.to_string(),
                    dnum: record.day(),
                });
            }
            match days.entry(number) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                }
                Entry::Occupied(_) => {
                    return Err(ValidationError::DuplicateDay { month, day: number });
                }
            }
        }
        if days.is_empty() {
            return Err(ValidationError::EmptyMonth(month));
        }

        let totals = Totals::of(days.values());
        debug!(
            year,
            month,
            days = totals.days,
            work = totals.work,
            rest = totals.rest,
            "Built month"
        );
        Ok(Self {
            year,
            month,
            days,
            totals,
        })
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[usize::from(self.month - 1)]
    }

    #[must_use]
    pub fn alias(&self) -> &'static str {
        MONTH_ALIASES[usize::from(self.month - 1)]
    }

    pub fn day(&self, key: impl Key) -> Option<&DayRecord> {
        let day = u8::try_from(key.number()?).ok()?;
        self.days.get(&day)
    }

    pub fn is_work(&self, key: impl Key) -> Option<bool> {
        self.day(key).map(DayRecord::is_work)
    }

    pub fn is_rest(&self, key: impl Key) -> Option<bool> {
        self.day(key).map(DayRecord::is_rest)
    }

    /// Days in ascending order.
    #[must_use]
    pub fn days(&self) -> btree_map::Values<'_, u8, DayRecord> {
        self.days.values()
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.totals
    }

    #[must_use]
    pub fn total_days(&self) -> usize {
        self.totals.days
    }

    #[must_use]
    pub fn work_days(&self) -> usize {
        self.totals.work
    }

    #[must_use]
    pub fn rest_days(&self) -> usize {
        self.totals.rest
    }
}

impl<'a> IntoIterator for &'a MonthView {
    type Item = &'a DayRecord;
    type IntoIter = btree_map::Values<'a, u8, DayRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

impl Display for MonthView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for day in self.days() {
            if first {
                first = false;
            } else {
                writeln!(f)?;
            }
            write!(f, "{day}")?;
        }
        Ok(())
    }
}
