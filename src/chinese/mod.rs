//! Chinese calendar
//!
//! Note: 为方便处理诸多术语，本模块文档用中文。
//!
//! 农历各月由 [`Almanac`] 编算：闰月位置查 [`leap`] 表，朔与交节由 [`ephemeris`]
//! 计算，已算得的月份缓存于 [`Almanac`] 内。
//!
//! 农历年份以正月为首。月份以有符号整数表示，负数为闰月，如 `-6` 即闰六月。
//!
//! 各年正月以该年冬至推定。若闰月表与推算的朔望月数不合，致使本年正月与前后两年
//! 均差一月，则以前后两年为准校正。公元 8 年与 238 年改历，年末一月与次年正月为同一朔望月，
//! 该月内的公历日归入次年正月。

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::Error;
use crate::date::{J2000, JulianDay, SolarDay};

pub mod ephemeris;
pub mod fmt;
pub mod leap;
pub mod term;

use self::ephemeris::{Analytic, Ephemeris, SYNODIC_MONTH};
use self::leap::LeapMonthTable;
pub use self::term::SolarTerm;

/// 支持的农历年份
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = -1..=9999;

/// 农历编算的入口，持有闰月表、历表与月份缓存。
///
/// 同一 `Almanac` 可在多线程间共用。
///
/// # 用例
///
/// ```
/// use festo::{Almanac, SolarDay};
///
/// let almanac = Almanac::new();
/// let day = SolarDay::from_ymd(2000, 1, 1).unwrap();
/// let lunar = almanac.lunar_day_of(&day).unwrap();
///
/// assert_eq!((1999, 11, 25), (lunar.year(), lunar.month(), lunar.day()));
/// assert_eq!("农历1999年冬月廿五", lunar.to_string());
/// ```
pub struct Almanac {
    leap: &'static LeapMonthTable,
    ephemeris: Arc<dyn Ephemeris + Send + Sync>,
    months: Cache<(i32, i32), LunarMonth>,
    new_years: Cache<i32, f64>,
}

impl Almanac {
    /// 以内置闰月表与 [`Analytic`] 历表创建。
    pub fn new() -> Self {
        Self::with_ephemeris(Analytic)
    }

    /// 以指定历表创建。
    pub fn with_ephemeris<E>(ephemeris: E) -> Self
    where
        E: Ephemeris + Send + Sync + 'static,
    {
        Self {
            leap: LeapMonthTable::shared(),
            ephemeris: Arc::new(ephemeris),
            months: Cache::default(),
            new_years: Cache::default(),
        }
    }

    /// 全进程共用的实例。
    pub fn shared() -> &'static Self {
        static SHARED: LazyLock<Almanac> = LazyLock::new(Almanac::new);
        &SHARED
    }

    pub fn ephemeris(&self) -> &dyn Ephemeris {
        &*self.ephemeris
    }

    /// `year` 年闰月位置，无闰月为 0。
    pub fn leap_month(&self, year: i32) -> u8 {
        self.leap.leap_month(year)
    }

    /// 已缓存的月份数。
    pub fn cached_months(&self) -> usize {
        self.months.len()
    }

    /// 取得农历年。
    ///
    /// 年份须在 [`YEAR_RANGE`] 内。
    pub fn lunar_year(&self, year: i32) -> Result<LunarYear, Error> {
        if !YEAR_RANGE.contains(&year) {
            return Err(Error::InvalidLunarYear { year });
        }
        Ok(LunarYear {
            year,
            leap_month: self.leap.leap_month(year),
        })
    }

    /// 取得农历月，`month` 为负表示闰月。
    ///
    /// # 用例
    ///
    /// ```
    /// use festo::{Almanac, Error};
    ///
    /// let almanac = Almanac::new();
    /// let month = almanac.lunar_month(2017, -6).unwrap();
    /// assert_eq!("2017年7月23日", month.first_julian_day().solar_day().to_string());
    /// assert_eq!(30, month.day_count());
    ///
    /// assert_eq!(
    ///     Err(Error::NoSuchLeapMonth { year: 2017, month: 5 }),
    ///     almanac.lunar_month(2017, -5),
    /// );
    /// ```
    pub fn lunar_month(&self, year: i32, month: i32) -> Result<LunarMonth, Error> {
        if let Some(m) = self.months.get(&(year, month)) {
            return Ok(m);
        }
        let m = self.compute_month(year, month)?;
        Ok(self.months.insert((year, month), m))
    }

    fn compute_month(&self, year: i32, month: i32) -> Result<LunarMonth, Error> {
        let lunar_year = self.lunar_year(year)?;
        if month == 0 || month.abs() > 12 {
            return Err(Error::InvalidLunarMonth { month });
        }
        let leap = month < 0;
        let m = month.abs();
        let leap_month = lunar_year.leap_month() as i32;
        if leap && m != leap_month {
            return Err(Error::NoSuchLeapMonth { year, month: m });
        }

        let eph = self.ephemeris();
        let mut index = m - 1;
        if leap || (leap_month > 0 && m > leap_month) {
            index += 1;
        }
        let w = self.new_year(year) + SYNODIC_MONTH * index as f64;
        let first = eph.new_moon(w);
        let day_count = (eph.new_moon(w + SYNODIC_MONTH) - first) as i32;

        debug!(year, month, day_count, "computed lunar month");
        Ok(LunarMonth {
            year,
            month: m,
            leap,
            day_count,
            index_in_year: index,
            first_julian_day: JulianDay::from_day(J2000 + first),
        })
    }

    /// `year` 年正月朔的估计日（相对 J2000），经缓存。
    fn new_year(&self, year: i32) -> f64 {
        if let Some(w) = self.new_years.get(&year) {
            return w;
        }
        let w = self.compute_new_year(year);
        self.new_years.insert(year, w)
    }

    fn compute_new_year(&self, year: i32) -> f64 {
        let eph = self.ephemeris();
        let estimate = self.winter_solstice_new_year(year);
        if year <= *YEAR_RANGE.start() || year >= *YEAR_RANGE.end() {
            return estimate;
        }
        let month_count = |y: i32| if self.leap.leap_month(y) > 0 { 13.0 } else { 12.0 };
        let own = eph.new_moon(estimate);
        let from_prev = eph.new_moon(
            eph.new_moon(self.winter_solstice_new_year(year - 1))
                + SYNODIC_MONTH * month_count(year - 1),
        );
        let from_next = eph.new_moon(
            eph.new_moon(self.winter_solstice_new_year(year + 1))
                - SYNODIC_MONTH * month_count(year),
        );
        if from_prev == from_next && from_prev != own {
            let shift = ((from_prev - own) / SYNODIC_MONTH).round();
            debug!(year, shift, "realigned new year with adjacent years");
            return estimate + SYNODIC_MONTH * shift;
        }
        estimate
    }

    /// 由 `year` 年冬至推得的正月朔估计日。
    fn winter_solstice_new_year(&self, year: i32) -> f64 {
        let winter_solstice = self.term_day(year, 0);
        let mut w = self.ephemeris().new_moon(winter_solstice);
        if w > winter_solstice {
            w -= 29.53;
        }
        // 冬至所在月到正月的月数
        let offset = if 8 < year && year < 24 {
            1
        } else if year != 239 && year != 240 && self.leap.leap_month(year - 1) > 10 {
            3
        } else {
            2
        };
        w + SYNODIC_MONTH * offset as f64
    }

    /// 取得农历日，`month` 为负表示闰月。
    pub fn lunar_day(&self, year: i32, month: i32, day: i32) -> Result<LunarDay, Error> {
        let lunar_month = self.lunar_month(year, month)?;
        if day < 1 || day > lunar_month.day_count {
            return Err(Error::InvalidLunarDay { year, month, day });
        }
        Ok(LunarDay {
            month: lunar_month,
            day,
        })
    }

    /// 公历日转农历日。
    ///
    /// 自与公历同序号的农历月起，逐月前后查找所在月。
    pub fn lunar_day_of(&self, solar: &SolarDay) -> Result<LunarDay, Error> {
        let offset = |month: &LunarMonth| solar.subtract(&month.first_julian_day.solar_day());
        let mut month = self.lunar_month(solar.year(), solar.month())?;
        while offset(&month) < 0 {
            month = month.next(self, -1)?;
        }
        while offset(&month) >= month.day_count {
            let next = month.next(self, 1)?;
            if offset(&next) < 0 {
                break;
            }
            month = next;
        }
        self.lunar_day(month.year, month.month_with_leap(), offset(&month) + 1)
    }
}

impl Default for Almanac {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Almanac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Almanac")
            .field("leap_years", &self.leap.len())
            .field("cached_months", &self.months.len())
            .finish_non_exhaustive()
    }
}

/// 编算结果的缓存，月份以 (年, 有符号月) 为键，正月估计日以年为键。
///
/// 同一键只写入一次：并发计算同一项时，后写者丢弃自己的结果，沿用已缓存者。
#[derive(Debug)]
struct Cache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V: Copy> Cache<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).copied()
    }

    fn insert(&self, key: K, value: V) -> V {
        *self.entries.write().entry(key).or_insert(value)
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// 农历年
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LunarYear {
    year: i32,
    leap_month: u8,
}

impl LunarYear {
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 闰月位置，无闰月为 0。
    pub fn leap_month(&self) -> u8 {
        self.leap_month
    }
    /// 有闰月为 13，否则为 12。
    pub fn month_count(&self) -> i32 {
        if self.leap_month > 0 { 13 } else { 12 }
    }
    /// 其后第 `n` 年。
    pub fn next(&self, almanac: &Almanac, n: i32) -> Result<LunarYear, Error> {
        almanac.lunar_year(self.year + n)
    }
}

/// 农历月
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LunarMonth {
    year: i32,
    month: i32,
    leap: bool,
    day_count: i32,
    index_in_year: i32,
    first_julian_day: JulianDay,
}

impl LunarMonth {
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 月序号 `1..=12`，不分平闰。
    pub fn month(&self) -> i32 {
        self.month
    }
    pub fn is_leap(&self) -> bool {
        self.leap
    }
    /// 月序号，闰月为负。
    pub fn month_with_leap(&self) -> i32 {
        if self.leap { -self.month } else { self.month }
    }
    /// 本月天数，29 或 30。
    pub fn day_count(&self) -> i32 {
        self.day_count
    }
    /// 在本年中的位置，正月为 0，闰月及其后各月顺延。
    pub fn index_in_year(&self) -> i32 {
        self.index_in_year
    }
    /// 初一（朔日）。
    pub fn first_julian_day(&self) -> JulianDay {
        self.first_julian_day
    }

    /// 其后第 `n` 月，`n` 可为负。`n == 0` 时经缓存重新取得本月。
    ///
    /// # 用例
    ///
    /// ```
    /// use festo::Almanac;
    ///
    /// let almanac = Almanac::new();
    /// let june = almanac.lunar_month(2025, 6).unwrap();
    /// assert_eq!(-6, june.next(&almanac, 1).unwrap().month_with_leap());
    /// assert_eq!(7, june.next(&almanac, 2).unwrap().month_with_leap());
    ///
    /// let first = almanac.lunar_month(2025, 1).unwrap();
    /// let prev = first.next(&almanac, -1).unwrap();
    /// assert_eq!((2024, 12), (prev.year(), prev.month()));
    /// ```
    pub fn next(&self, almanac: &Almanac, n: i32) -> Result<LunarMonth, Error> {
        if n == 0 {
            return almanac.lunar_month(self.year, self.month_with_leap());
        }
        let mut m = self.index_in_year + 1 + n;
        let mut y = self.year;
        if n > 0 {
            let mut count = almanac.lunar_year(y)?.month_count();
            while m > count {
                m -= count;
                y += 1;
                count = almanac.lunar_year(y)?.month_count();
            }
        } else {
            while m <= 0 {
                y -= 1;
                m += almanac.lunar_year(y)?.month_count();
            }
        }
        let leap_month = almanac.leap_month(y) as i32;
        let mut leap = false;
        if leap_month > 0 {
            leap = m == leap_month + 1;
            if m > leap_month {
                m -= 1;
            }
        }
        almanac.lunar_month(y, if leap { -m } else { m })
    }
}

impl std::fmt::Display for LunarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "农历{}年{}", self.year, fmt::month(self.month_with_leap()))
    }
}

/// 农历日
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LunarDay {
    month: LunarMonth,
    day: i32,
}

impl LunarDay {
    pub fn year(&self) -> i32 {
        self.month.year
    }
    /// 月序号，闰月为负。
    pub fn month(&self) -> i32 {
        self.month.month_with_leap()
    }
    /// 月序号 `1..=12`，不分平闰。
    pub fn month_value(&self) -> i32 {
        self.month.month
    }
    pub fn day(&self) -> i32 {
        self.day
    }
    pub fn lunar_month(&self) -> &LunarMonth {
        &self.month
    }
    /// 对应公历日。
    pub fn solar_day(&self) -> SolarDay {
        self.month.first_julian_day.next(self.day - 1).solar_day()
    }
    /// 其后第 `n` 日，按公历日推移后再转回农历。
    pub fn next(&self, almanac: &Almanac, n: i32) -> Result<LunarDay, Error> {
        almanac.lunar_day_of(&self.solar_day().next(n))
    }
}

impl std::fmt::Display for LunarDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.month, fmt::day(self.day))
    }
}
