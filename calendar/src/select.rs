use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum SelectionError {
    #[error("Expected at most 12 months, got {0}")]
    TooMany(usize),
    #[error("Month {0} is not in 1..=12")]
    OutOfRange(u32),
    #[error("Month {0} is selected more than once")]
    Duplicate(u32),
    #[error("Month {0} is not part of the calendar")]
    Missing(u32),
    #[error("Expected a selector in the format <month>[{sep}<day>], got {path:?}")]
    Path { path: String, sep: char },
}

/// A month or day key given either as a number or as numeric text.
///
/// Text keys may carry leading zeros and surrounding whitespace, so `7`,
/// `"7"` and `"07"` all address the same entry.
pub trait Key {
    fn number(&self) -> Option<u32>;
}

impl Key for str {
    fn number(&self) -> Option<u32> {
        let s = self.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    }
}

impl Key for String {
    fn number(&self) -> Option<u32> {
        self.as_str().number()
    }
}

impl<K: Key + ?Sized> Key for &K {
    fn number(&self) -> Option<u32> {
        (**self).number()
    }
}

macro_rules! key_from {
    ($($t:ty),*) => {
        $(impl Key for $t {
            fn number(&self) -> Option<u32> {
                Some(u32::from(*self))
            }
        })*
    };
}

macro_rules! key_try_from {
    ($($t:ty),*) => {
        $(impl Key for $t {
            fn number(&self) -> Option<u32> {
                u32::try_from(*self).ok()
            }
        })*
    };
}

key_from!(u8, u16, u32);
key_try_from!(u64, usize, i32, i64);

/// A dotted selector addressing a month (`"1"`) or a day of a month (`"1.31"`).
///
/// Selectors are only accepted as text: a float such as `1.30` cannot be told
/// apart from `1.3` once parsed.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Path {
    pub month: u32,
    pub day: Option<u32>,
}

impl Path {
    pub const SEPARATOR: char = '.';

    pub fn parse(s: &str, sep: char) -> Result<Self, SelectionError> {
        let invalid = || SelectionError::Path {
            path: s.to_owned(),
            sep,
        };
        let (month, day) = match s.split_once(sep) {
            Some((month, day)) => (month, Some(day)),
            None => (s, None),
        };
        let month = month.number().ok_or_else(invalid)?;
        let day = day
            .map(|day| day.number().ok_or_else(invalid))
            .transpose()?;
        Ok(Self { month, day })
    }
}

impl FromStr for Path {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, Self::SEPARATOR)
    }
}
