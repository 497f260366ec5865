//! Chinese lunisolar calendar conversion and festival lookup.
//!
//! Gregorian days ([`SolarDay`]) convert to lunar days through an
//! [`Almanac`], which computes lunar months from new moons and solar terms
//! and caches them. On top of that, the [`festival`] module tells which
//! festival or solar term falls on a day and finds the nearest one.
//!
//! # Examples
//!
//! Basic usage with [`SolarDay`]:
//!
//! ```
//! use festo::SolarDay;
//!
//! let day = SolarDay::from_ymd(2000, 1, 1).unwrap();
//!
//! assert_eq!(2451544.5, day.julian_day().day());
//! assert_eq!("2000年1月2日", day.next(1).to_string());
//! ```
//!
//! Chinese lunisolar calendar:
//!
//! ```
//! use festo::{Almanac, SolarDay};
//!
//! let almanac = Almanac::new();
//! let day = SolarDay::from_ymd(2017, 7, 23).unwrap();
//! let lunar = almanac.lunar_day_of(&day).unwrap();
//!
//! assert_eq!((2017, -6, 1), (lunar.year(), lunar.month(), lunar.day()));
//! assert_eq!("农历2017年闰六月初一", lunar.to_string());
//! ```
//!
//! Nearest festival:
//!
//! ```
//! use festo::SolarDay;
//!
//! let day = SolarDay::from_ymd(2026, 2, 10).unwrap();
//! let festival = festo::nearest_festival(&day, 60).unwrap().unwrap();
//!
//! assert_eq!("除夕", festival.name());
//! assert_eq!(6, festival.info(&day).days);
//! ```

pub mod chinese;
pub mod date;
pub mod error;
pub mod festival;
pub mod time_scales;

pub use chinese::{Almanac, LunarDay, LunarMonth, LunarYear, SolarTerm};
pub use date::{JulianDay, SolarDay, YearType};
pub use error::Error;
pub use festival::{Festival, FestivalInfo, FestivalType};

/// The current day on the local clock.
pub fn today() -> SolarDay {
    SolarDay::now()
}

/// Finds the first festival within `max_days` days from `day`, using the
/// process-wide [`Almanac::shared`].
pub fn nearest_festival(day: &SolarDay, max_days: u32) -> Result<Option<Festival>, Error> {
    Almanac::shared().nearest_festival(day, max_days)
}
