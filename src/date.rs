//! Julian days and Gregorian calendar days.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::error::Error;

/// Julian day of 2000-01-01 12:00:00.
pub const J2000: f64 = 2451545.0;

/// `year * 372 + month * 31 + day` of 1582-10-15, the first Gregorian day.
const GREGORIAN_REFORM: i32 = 588829;

/// Julian day number (integral part) of 1582-10-15.
const GREGORIAN_REFORM_JDN: i32 = 2299161;

/// A point in time as a continuous count of days.
///
/// Dates from 1582-10-15 on are read in the Gregorian calendar, earlier ones
/// in the Julian calendar.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDay(f64);

impl JulianDay {
    /// Creates a `JulianDay` from a raw day count.
    pub fn from_day(day: f64) -> Self {
        Self(day)
    }
    /// Returns the raw day count.
    pub fn day(&self) -> f64 {
        self.0
    }

    /// Converts a calendar date and time of day into a Julian day.
    ///
    /// No validation is done; out-of-range fields simply spill into the
    /// neighbouring units.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::date::{J2000, JulianDay};
    ///
    /// let jd = JulianDay::from_ymd_hms(2000, 1, 1, 12, 0, 0);
    /// assert_eq!(J2000, jd.day());
    /// ```
    pub fn from_ymd_hms(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    ) -> Self {
        let d = day as f64 + ((second as f64 / 60.0 + minute as f64) / 60.0 + hour as f64) / 24.0;
        let gregorian = year * 372 + month * 31 + d.trunc() as i32 >= GREGORIAN_REFORM;
        let (y, m) = if month <= 2 {
            (year - 1, month + 12)
        } else {
            (year, month)
        };
        let n = if gregorian {
            let c = (y as f64 * 0.01).trunc();
            2.0 - c + (c * 0.25).trunc()
        } else {
            0.0
        };
        Self(
            (365.25 * (y + 4716) as f64).trunc() + (30.6001 * (m + 1) as f64).trunc() + d + n
                - 1524.5,
        )
    }

    /// Converts back into a calendar day, keeping the time of day to the
    /// nearest second.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::date::JulianDay;
    ///
    /// let day = JulianDay::from_day(2451545.25).solar_day();
    /// assert_eq!((2000, 1, 1), (day.year(), day.month(), day.day()));
    /// assert_eq!((18, 0, 0), (day.hour(), day.minute(), day.second()));
    /// ```
    pub fn solar_day(&self) -> SolarDay {
        let mut d = (self.0 + 0.5).trunc() as i32;
        let mut f = self.0 + 0.5 - d as f64;
        if d >= GREGORIAN_REFORM_JDN {
            let c = ((d as f64 - 1867216.25) / 36524.25).trunc() as i32;
            d += 1 + c - (c as f64 * 0.25).trunc() as i32;
        }
        d += 1524;
        let mut year = ((d as f64 - 122.1) / 365.25).trunc() as i32;
        d -= (365.25 * year as f64).trunc() as i32;
        let mut month = (d as f64 / 30.601).trunc() as i32;
        d -= (30.601 * month as f64).trunc() as i32;
        if month > 13 {
            month -= 12;
        } else {
            year -= 1;
        }
        month -= 1;
        year -= 4715;

        f *= 24.0;
        let mut hour = f.trunc() as i32;
        f -= hour as f64;
        f *= 60.0;
        let mut minute = f.trunc() as i32;
        f -= minute as f64;
        f *= 60.0;
        let mut second = f.round() as i32;
        if second >= 60 {
            minute += 1;
            second -= 60;
        }
        if minute >= 60 {
            hour += 1;
            minute -= 60;
        }
        SolarDay {
            year,
            month,
            day: d,
            hour,
            minute,
            second,
        }
    }

    /// Returns the Julian day `n` days later (earlier if negative).
    pub fn next(&self, n: i32) -> Self {
        *self + n
    }
    /// Returns `self - other` in days.
    pub fn subtract(&self, other: JulianDay) -> f64 {
        *self - other
    }
}

impl Add<i32> for JulianDay {
    type Output = JulianDay;
    fn add(self, rhs: i32) -> Self::Output {
        JulianDay(self.0 + rhs as f64)
    }
}
impl Sub<JulianDay> for JulianDay {
    type Output = f64;
    fn sub(self, rhs: JulianDay) -> Self::Output {
        self.0 - rhs.0
    }
}

/// Indicates whether a year is a leap year or common year.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum YearType {
    Common,
    Leap,
}

impl YearType {
    /// Determines if `year` is a leap year.
    ///
    /// Years before 1600 follow the Julian rule (every fourth year), later
    /// ones the Gregorian rule.
    pub fn from_gregorian(year: i32) -> Self {
        let leap = if year < 1600 {
            year % 4 == 0
        } else {
            year % 4 == 0 && year % 100 != 0 || year % 400 == 0
        };
        if leap { Self::Leap } else { Self::Common }
    }
    /// Returns `true` if `self` is `Leap`, otherwise `false`.
    pub fn is_leap(&self) -> bool {
        matches!(self, YearType::Leap)
    }
}

/// Number of days in `month` (`1..=12`) of `year`.
///
/// # Panics
///
/// Panics if `month` is not in `1..=12`.
pub fn days_in_month(year: i32, month: i32) -> i32 {
    const DAYS: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && YearType::from_gregorian(year).is_leap() {
        return 29;
    }
    DAYS[(month - 1) as usize]
}

/// A Gregorian calendar day, optionally carrying a time of day.
///
/// Equality, ordering and hashing only look at the date; the time of day is
/// kept so that stepping by whole days preserves it.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct SolarDay {
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
}

impl SolarDay {
    /// Creates a `SolarDay` at midnight.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::SolarDay;
    ///
    /// assert!(SolarDay::from_ymd(2024, 2, 29).is_ok());
    /// assert!(SolarDay::from_ymd(2023, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: i32, day: i32) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidSolarMonth { month });
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(Error::InvalidSolarDay { year, month, day });
        }
        Ok(Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
        })
    }
    /// Creates a `SolarDay` from a chrono date and time, dropping sub-second
    /// precision.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month() as i32,
            day: dt.day() as i32,
            hour: dt.hour() as i32,
            minute: dt.minute() as i32,
            second: dt.second() as i32,
        }
    }
    /// The current day and time on the local clock.
    pub fn now() -> Self {
        Self::from_naive(chrono::Local::now().naive_local())
    }

    pub fn year(&self) -> i32 {
        self.year
    }
    pub fn month(&self) -> i32 {
        self.month
    }
    pub fn day(&self) -> i32 {
        self.day
    }
    pub fn hour(&self) -> i32 {
        self.hour
    }
    pub fn minute(&self) -> i32 {
        self.minute
    }
    pub fn second(&self) -> i32 {
        self.second
    }

    /// The Julian day of this day, including its time of day.
    pub fn julian_day(&self) -> JulianDay {
        JulianDay::from_ymd_hms(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }
    fn midnight(&self) -> JulianDay {
        JulianDay::from_ymd_hms(self.year, self.month, self.day, 0, 0, 0)
    }

    /// Returns the day `n` days later (earlier if negative), at the same time
    /// of day.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::SolarDay;
    ///
    /// let day = SolarDay::from_ymd(2024, 2, 28).unwrap();
    /// assert_eq!(SolarDay::from_ymd(2024, 3, 1).unwrap(), day.next(2));
    /// ```
    pub fn next(&self, n: i32) -> Self {
        self.julian_day().next(n).solar_day()
    }

    /// Whole calendar days from `other` to `self`, ignoring time of day.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::SolarDay;
    ///
    /// let a = SolarDay::from_ymd(2025, 1, 29).unwrap();
    /// let b = SolarDay::from_ymd(2024, 12, 31).unwrap();
    /// assert_eq!(29, a.subtract(&b));
    /// ```
    pub fn subtract(&self, other: &SolarDay) -> i32 {
        (self.midnight() - other.midnight()).round() as i32
    }

    fn ymd(&self) -> (i32, i32, i32) {
        (self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for SolarDay {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date.and_time(chrono::NaiveTime::MIN))
    }
}

impl PartialEq for SolarDay {
    fn eq(&self, other: &Self) -> bool {
        self.ymd() == other.ymd()
    }
}
impl Eq for SolarDay {}

impl Hash for SolarDay {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ymd().hash(state);
    }
}

impl PartialOrd for SolarDay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SolarDay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ymd().cmp(&other.ymd())
    }
}

impl fmt::Display for SolarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年{}月{}日", self.year, self.month, self.day)
    }
}
