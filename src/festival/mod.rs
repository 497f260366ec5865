//! Festivals and solar terms falling on a given day, and the search for the
//! nearest one.
//!
//! A day is checked against, in order: the solar (Gregorian) festival table,
//! the lunar festival table (fixed lunar dates, then dates derived from solar
//! terms, then New Year's Eve), and finally the 24 solar terms. The first
//! match is the festival of that day.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::Error;
use crate::chinese::{Almanac, LunarDay};
use crate::date::SolarDay;

pub mod catalog;

use self::catalog::LunarRule;

/// Kind of a [`Festival`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum FestivalType {
    #[serde(rename = "Solar Festival")]
    Solar,
    #[serde(rename = "Lunar Festival")]
    Lunar,
    #[serde(rename = "Solar Term")]
    Term,
}

impl FestivalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solar => "Solar Festival",
            Self::Lunar => "Lunar Festival",
            Self::Term => "Solar Term",
        }
    }

    /// 公历节日, 农历节日 or 节气.
    pub fn chinese_name(&self) -> &'static str {
        match self {
            Self::Solar => "公历节日",
            Self::Lunar => "农历节日",
            Self::Term => "节气",
        }
    }
}

impl fmt::Display for FestivalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A festival or solar term on a particular day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Festival {
    #[serde(rename = "type")]
    kind: FestivalType,
    name: &'static str,
    day: SolarDay,
}

impl Festival {
    pub fn kind(&self) -> FestivalType {
        self.kind
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn day(&self) -> SolarDay {
        self.day
    }

    /// The record handed to callers, with the distance in days from `from`.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::{Almanac, SolarDay};
    ///
    /// let almanac = Almanac::new();
    /// let from = SolarDay::from_ymd(2024, 12, 28).unwrap();
    /// let festival = almanac.nearest_festival(&from, 30).unwrap().unwrap();
    /// let info = festival.info(&from);
    ///
    /// assert_eq!(("元旦", 4, "Solar Festival"), (info.name.as_str(), info.days, info.kind.as_str()));
    /// ```
    pub fn info(&self, from: &SolarDay) -> FestivalInfo {
        FestivalInfo {
            name: self.name.to_owned(),
            days: self.day.subtract(from),
            kind: self.kind.to_string(),
        }
    }
}

impl fmt::Display for Festival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.day, self.name, self.kind)
    }
}

/// Festival summary surfaced to a caller: name, days away and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FestivalInfo {
    pub name: String,
    pub days: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FestivalInfo {
    /// The record shown when no festival was found.
    pub fn none() -> Self {
        Self {
            name: "无".to_owned(),
            days: 0,
            kind: String::new(),
        }
    }
}

impl Almanac {
    /// Returns the festival on `day`, if any.
    ///
    /// Errors only when the day lies outside the supported lunar years.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::{Almanac, FestivalType, SolarDay};
    ///
    /// let almanac = Almanac::new();
    /// let day = SolarDay::from_ymd(2025, 10, 6).unwrap();
    /// let festival = almanac.festival_on(&day).unwrap().unwrap();
    ///
    /// assert_eq!("中秋节", festival.name());
    /// assert_eq!(FestivalType::Lunar, festival.kind());
    /// ```
    pub fn festival_on(&self, day: &SolarDay) -> Result<Option<Festival>, Error> {
        let found = |kind, name| Some(Festival { kind, name, day: *day });

        if let Some(rule) = catalog::solar_rules().iter().find(|r| r.matches(day)) {
            return Ok(found(FestivalType::Solar, rule.name));
        }
        let lunar = self.lunar_day_of(day)?;
        if let Some(name) = self.lunar_festival(&lunar)? {
            return Ok(found(FestivalType::Lunar, name));
        }
        Ok(self
            .solar_term_of(day)
            .and_then(|term| found(FestivalType::Term, term.name())))
    }

    fn lunar_festival(&self, lunar: &LunarDay) -> Result<Option<&'static str>, Error> {
        let rules = catalog::lunar_rules();
        let ymd = (lunar.year(), lunar.month(), lunar.day());

        for entry in rules {
            if let LunarRule::Date { month, day } = entry.rule
                && (month, day) == (lunar.month(), lunar.day())
            {
                return Ok(Some(entry.name));
            }
        }
        for entry in rules {
            if let LunarRule::Term { index } = entry.rule {
                let term = self.solar_term(lunar.year(), index);
                let d = self.lunar_day_of(&term.solar_day())?;
                if (d.year(), d.month(), d.day()) == ymd {
                    return Ok(Some(entry.name));
                }
            }
        }
        for entry in rules {
            if entry.rule == LunarRule::Eve {
                let next = lunar.next(self, 1)?;
                if (next.month(), next.day()) == (1, 1) {
                    return Ok(Some(entry.name));
                }
            }
        }
        Ok(None)
    }

    /// Scans `start` and the following `max_days` days, returning the first
    /// festival found.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::{Almanac, SolarDay};
    ///
    /// let almanac = Almanac::new();
    /// let start = SolarDay::from_ymd(2025, 1, 1).unwrap();
    /// let festival = almanac.nearest_festival(&start, 30).unwrap().unwrap();
    /// assert_eq!("元旦", festival.name());
    /// assert_eq!(start, festival.day());
    ///
    /// let start = SolarDay::from_ymd(2025, 1, 2).unwrap();
    /// assert!(almanac.nearest_festival(&start, 2).unwrap().is_none());
    /// ```
    pub fn nearest_festival(
        &self,
        start: &SolarDay,
        max_days: u32,
    ) -> Result<Option<Festival>, Error> {
        for i in 0..=max_days {
            let day = start.next(i as i32);
            trace!(%day, "checking day");
            if let Some(festival) = self.festival_on(&day)? {
                debug!(%festival, offset = i, "found festival");
                return Ok(Some(festival));
            }
        }
        debug!(%start, max_days, "no festival in range");
        Ok(None)
    }
}
