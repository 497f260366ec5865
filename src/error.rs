//! Errors raised when constructing calendar values.

/// An invalid calendar value was requested.
///
/// Construction never clamps or corrects its input; every rejected value is
/// reported through one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Gregorian month outside `1..=12`.
    #[error("invalid solar month: {month}")]
    InvalidSolarMonth { month: i32 },

    /// Gregorian day outside the length of its month.
    #[error("invalid solar day: {year}-{month}-{day}")]
    InvalidSolarDay { year: i32, month: i32, day: i32 },

    /// Lunar year outside `-1..=9999`.
    #[error("invalid lunar year: {year}")]
    InvalidLunarYear { year: i32 },

    /// Lunar month magnitude outside `1..=12`.
    #[error("invalid lunar month: {month}")]
    InvalidLunarMonth { month: i32 },

    /// A leap month was requested at a position the year does not have.
    #[error("lunar year {year} has no leap month {month}")]
    NoSuchLeapMonth { year: i32, month: i32 },

    /// Lunar day outside the length of its month.
    #[error("invalid lunar day: {year}-{month}-{day}")]
    InvalidLunarDay { year: i32, month: i32, day: i32 },
}
