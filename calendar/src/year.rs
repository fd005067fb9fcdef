use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

use tracing::debug;

use crate::ingest::{MonthData, RawCalendar};
use crate::select::{Key, Path, SelectionError};
use crate::{DayRecord, MonthView, Totals, ValidationError};

const ALL_MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// A validated production calendar year.
///
/// Every month is validated and built when the year is constructed, so
/// malformed input fails before any query. Lookups never fail, they miss.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct YearView {
    year: i32,
    months: BTreeMap<u8, MonthView>,
}

fn parse_year(key: &str) -> Option<i32> {
    let year = i32::try_from(key.number()?).ok()?;
    (1000..=9999).contains(&year).then_some(year)
}

fn parse_month(key: &str) -> Option<u8> {
    u8::try_from(key.number()?)
        .ok()
        .filter(|m| (1..=12).contains(m))
}

impl YearView {
    pub fn new(raw: RawCalendar) -> Result<Self, ValidationError> {
        if raw.len() > 1 {
            return Err(ValidationError::RootKeys(raw.len()));
        }
        let (key, raw_months) = raw.into_iter().next().ok_or(ValidationError::Empty)?;
        let year = parse_year(&key).ok_or(ValidationError::Year(key))?;
        if raw_months.is_empty() {
            return Err(ValidationError::NoMonths(year));
        }

        let mut months = BTreeMap::new();
        for (key, raw_month) in raw_months {
            let month = parse_month(&key).ok_or(ValidationError::MonthKey(key))?;
            let view = MonthData::from(raw_month).build(year, month)?;
            match months.entry(month) {
                Entry::Vacant(entry) => {
                    entry.insert(view);
                }
                Entry::Occupied(_) => return Err(ValidationError::DuplicateMonth(month)),
            }
        }
        debug!(year, months = months.len(), "Loaded calendar year");
        Ok(Self { year, months })
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Months present in the input, January first.
    #[must_use]
    pub fn months(&self) -> btree_map::Values<'_, u8, MonthView> {
        self.months.values()
    }

    pub fn month(&self, key: impl Key) -> Option<&MonthView> {
        let month = u8::try_from(key.number()?).ok()?;
        self.months.get(&month)
    }

    /// Selects months in the order given, all twelve if `months` is empty.
    ///
    /// The result is keyed by month alias (`jan`, `feb`, ...) and keeps the
    /// requested order, so `select_months(&[3, 1])` yields `mar` then `jan`.
    pub fn select_months(&self, months: &[u32]) -> Result<Months<'_>, SelectionError> {
        if months.len() > ALL_MONTHS.len() {
            return Err(SelectionError::TooMany(months.len()));
        }
        let months = if months.is_empty() {
            &ALL_MONTHS[..]
        } else {
            months
        };
        if let Some(&month) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(SelectionError::OutOfRange(month));
        }
        for (i, month) in months.iter().enumerate() {
            if months[..i].contains(month) {
                return Err(SelectionError::Duplicate(*month));
            }
        }

        let entries = months
            .iter()
            .map(|&month| {
                let view = self.month(month).ok_or(SelectionError::Missing(month))?;
                Ok((view.alias(), view))
            })
            .collect::<Result<Vec<_>, SelectionError>>()?;
        Ok(Months { entries })
    }

    /// Resolves `"<month>"` to a month and `"<month>.<day>"` to a day.
    pub fn select(&self, path: &str) -> Option<Selection<'_>> {
        self.select_with(path, Path::SEPARATOR)
    }

    pub fn select_with(&self, path: &str, sep: char) -> Option<Selection<'_>> {
        let Path { month, day } = Path::parse(path, sep).ok()?;
        let month = self.month(month)?;
        match day {
            None => Some(Selection::Month(month)),
            Some(day) => month.day(day).map(Selection::Day),
        }
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.months().map(MonthView::totals).sum()
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Selection<'a> {
    Month(&'a MonthView),
    Day(&'a DayRecord),
}

impl<'a> Selection<'a> {
    #[must_use]
    pub fn month(self) -> Option<&'a MonthView> {
        match self {
            Selection::Month(month) => Some(month),
            Selection::Day(_) => None,
        }
    }

    #[must_use]
    pub fn day(self) -> Option<&'a DayRecord> {
        match self {
            Selection::Day(day) => Some(day),
            Selection::Month(_) => None,
        }
    }
}

/// Months picked by [`YearView::select_months`], in request order.
#[derive(Debug, Clone)]
pub struct Months<'a> {
    entries: Vec<(&'static str, &'a MonthView)>,
}

impl<'a> Months<'a> {
    #[must_use]
    pub fn get(&self, alias: &str) -> Option<&'a MonthView> {
        self.entries
            .iter()
            .find(|(a, _)| *a == alias)
            .map(|(_, month)| *month)
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&'static str, &'a MonthView)> {
        self.entries.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(alias, _)| *alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'a MonthView)> + '_ {
        self.entries.iter().copied()
    }

    pub fn views(&self) -> impl Iterator<Item = &'a MonthView> + '_ {
        self.entries.iter().map(|(_, month)| *month)
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.views().map(MonthView::totals).sum()
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use crate::ingest::{RawCalendar, RawDay, RawMonth, RawYear};
    use crate::select::SelectionError;
    use crate::year::{Selection, YearView};
    use crate::ValidationError;

    /// Every month of 2023 with its first and last day, weekdays made up.
    fn months() -> RawYear {
        (1..=12)
            .map(|month| {
                let days = [1, 28]
                    .into_iter()
                    .map(|dnum| {
                        (
                            dnum.to_string(),
                            RawDay {
                                dnum,
                                dweek: 1 + (dnum + month) % 7,
                                dtype: if dnum == 1 { 3 } else { 0 },
                                ttip: String::new(),
                            },
                        )
                    })
                    .collect();
                (month.to_string(), RawMonth::Compact(days))
            })
            .collect()
    }

    fn year() -> YearView {
        YearView::new(RawCalendar::from([("2023".to_owned(), months())])).unwrap()
    }

    #[test]
    fn test_year_number() {
        assert_eq!(year().year(), 2023);
        assert_eq!(year().months().count(), 12);
    }

    #[test]
    fn test_invalid_roots() {
        let tests = [
            (RawCalendar::new(), ValidationError::Empty),
            (
                RawCalendar::from([
                    ("2022".to_owned(), months()),
                    ("2023".to_owned(), months()),
                ]),
                ValidationError::RootKeys(2),
            ),
            (
                RawCalendar::from([("abc".to_owned(), months())]),
                ValidationError::Year("abc".to_owned()),
            ),
            (
                RawCalendar::from([("999".to_owned(), months())]),
                ValidationError::Year("999".to_owned()),
            ),
            (
                RawCalendar::from([("20230".to_owned(), months())]),
                ValidationError::Year("20230".to_owned()),
            ),
            (
                RawCalendar::from([("2023".to_owned(), RawYear::new())]),
                ValidationError::NoMonths(2023),
            ),
        ];

        for (raw, e) in tests {
            assert_eq!(YearView::new(raw), Err(e));
        }
    }

    #[test]
    fn test_invalid_months() {
        let mut raw = months();
        raw.insert("13".to_owned(), raw["1"].clone());
        assert_eq!(
            YearView::new(RawCalendar::from([("2023".to_owned(), raw)])),
            Err(ValidationError::MonthKey("13".to_owned()))
        );

        let mut raw = months();
        raw.insert("01".to_owned(), raw["1"].clone());
        assert_eq!(
            YearView::new(RawCalendar::from([("2023".to_owned(), raw)])),
            Err(ValidationError::DuplicateMonth(1))
        );

        let mut raw = months();
        raw.insert("2".to_owned(), RawMonth::Compact(BTreeMap::new()));
        assert_eq!(
            YearView::new(RawCalendar::from([("2023".to_owned(), raw)])),
            Err(ValidationError::EmptyMonth(2))
        );
    }

    #[test]
    fn test_select_months() {
        let year = year();

        let months = year.select_months(&[1, 2, 3]).unwrap();
        assert_eq!(months.len(), 3);
        assert_eq!(months.aliases().collect::<Vec<_>>(), ["jan", "feb", "mar"]);

        let months = year.select_months(&[3, 1, 2]).unwrap();
        assert_eq!(months.aliases().collect::<Vec<_>>(), ["mar", "jan", "feb"]);
        assert_eq!(months.get_index(0).map(|(_, m)| m.month()), Some(3));
        assert_eq!(months.get("jan").map(|m| m.month()), Some(1));
        assert!(std::ptr::eq(months.get("feb").unwrap(), year.month(2).unwrap()));
        assert_eq!(months.get("dec"), None);

        let all = year.select_months(&[]).unwrap();
        assert_eq!(all.len(), 12);
        assert_eq!(
            all.views().map(|m| m.month()).collect::<Vec<_>>(),
            (1..=12).collect::<Vec<_>>()
        );
        assert_eq!(all.totals(), year.totals());
        assert_eq!(all.totals().days, 24);
        assert_eq!(all.totals().rest, 12);
    }

    #[test]
    fn test_select_months_errors() {
        let year = year();
        assert_eq!(
            year.select_months(&[1, 1]).unwrap_err(),
            SelectionError::Duplicate(1)
        );
        assert_eq!(
            year.select_months(&(1..14).collect::<Vec<_>>()).unwrap_err(),
            SelectionError::TooMany(13)
        );
        assert_eq!(
            year.select_months(&[0]).unwrap_err(),
            SelectionError::OutOfRange(0)
        );
        assert_eq!(
            year.select_months(&[5, 13]).unwrap_err(),
            SelectionError::OutOfRange(13)
        );

        let mut raw = months();
        raw.remove("4");
        let partial = YearView::new(RawCalendar::from([("2023".to_owned(), raw)])).unwrap();
        assert_eq!(
            partial.select_months(&[]).unwrap_err(),
            SelectionError::Missing(4)
        );
        assert_eq!(partial.select_months(&[5, 3]).unwrap().len(), 2);
    }

    #[test]
    fn test_month_lookup() {
        let year = year();
        assert_eq!(year.month(1).map(|m| m.name()), Some("Январь"));
        assert_eq!(year.month("12").map(|m| m.name()), Some("Декабрь"));
        assert_eq!(year.month("012"), year.month(12));
        assert_eq!(year.month(0), None);
        assert_eq!(year.month(13), None);
        assert_eq!(year.month("abc"), None);
    }

    #[test]
    fn test_select() {
        let year = year();
        let day = year.month(1).unwrap().day(28).unwrap();

        assert_eq!(year.select("1.28"), Some(Selection::Day(day)));
        assert_eq!(year.select("01.28"), Some(Selection::Day(day)));
        assert_eq!(year.select_with("1/28", '/'), Some(Selection::Day(day)));
        assert!(std::ptr::eq(
            year.select("1").and_then(Selection::month).unwrap(),
            year.month(1).unwrap()
        ));

        for path in ["abc", "", "1.2.3", "99.5", "13", "1.31", "1.x", "0.1"] {
            assert_eq!(year.select(path), None, "{path}");
        }
    }
}
