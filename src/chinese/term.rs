//! 节气
//!
//! 一岁二十四节气自冬至起算，序号 `0..24` 依次为冬至、小寒……大雪。
//! 第 `year` 年的冬至落在公历 `year - 1` 年十二月。

use std::fmt;

use super::Almanac;
use super::ephemeris::{Ephemeris, TROPICAL_YEAR};
use crate::date::{J2000, JulianDay, SolarDay};

/// 节气名，自冬至起。
pub const NAMES: [&str; 24] = [
    "冬至", "小寒", "大寒", "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种",
    "夏至", "小暑", "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪",
];

/// 某年某一节气。
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarTerm {
    year: i32,
    index: usize,
    cursory_julian_day: f64,
}

impl SolarTerm {
    /// 所属年份，即以该年冬至起算的一岁。
    pub fn year(&self) -> i32 {
        self.year
    }
    /// 序号，`0..24`，0 为冬至。
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn name(&self) -> &'static str {
        NAMES[self.index]
    }
    /// 交节日，相对 J2000 的日数。
    pub fn cursory_julian_day(&self) -> f64 {
        self.cursory_julian_day
    }
    pub fn julian_day(&self) -> JulianDay {
        JulianDay::from_day(J2000 + self.cursory_julian_day)
    }
    /// 交节当日（北京时间）。
    pub fn solar_day(&self) -> SolarDay {
        self.julian_day().solar_day()
    }
}

impl fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Almanac {
    /// 取得 `year` 年第 `index` 个节气。
    ///
    /// `index` 可越出 `0..24`，每 24 个进退一年。
    ///
    /// # 用例
    ///
    /// ```
    /// use festo::Almanac;
    ///
    /// let almanac = Almanac::new();
    /// let term = almanac.solar_term(2025, 3);
    /// assert_eq!("立春", term.name());
    /// assert_eq!("2025年2月3日", term.solar_day().to_string());
    ///
    /// // 2024 年的大雪
    /// assert_eq!("大雪", almanac.solar_term(2025, -1).name());
    /// assert_eq!(2024, almanac.solar_term(2025, -1).year());
    /// ```
    pub fn solar_term(&self, year: i32, index: i32) -> SolarTerm {
        let idx = index.rem_euclid(24);
        let mut year = year + index / 24;
        if index < 0 && idx != 0 {
            year -= 1;
        }
        SolarTerm {
            year,
            index: idx as usize,
            cursory_julian_day: self.term_day(year, idx),
        }
    }

    /// 取得当日交节的节气，当日无交节则为 `None`。
    ///
    /// 依次查该年全部节气及次年冬至、小寒。
    pub fn solar_term_of(&self, day: &SolarDay) -> Option<SolarTerm> {
        let year = day.year();
        (0..24)
            .map(|i| self.solar_term(year, i))
            .chain((0..2).map(|i| self.solar_term(year + 1, i)))
            .find(|term| term.solar_day() == *day)
    }

    /// 以平气估计 `year` 年冬至，再推得其后第 `offset` 个节气的交节日。
    pub(crate) fn term_day(&self, year: i32, offset: i32) -> f64 {
        let eph = self.ephemeris();
        let jd = ((year - 2000) as f64 * TROPICAL_YEAR + 180.0).floor();
        let mut w = ((jd - 355.0 + 183.0) / TROPICAL_YEAR).floor() * TROPICAL_YEAR + 355.0;
        if eph.term_crossing(w) > jd {
            w -= TROPICAL_YEAR;
        }
        eph.term_crossing(w + 15.2184 * offset as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: i32, d: i32) -> SolarDay {
        SolarDay::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn terms_of_year() {
        let almanac = Almanac::new();
        for (year, index, std) in [
            (2017, 0, ymd(2016, 12, 21)),
            (2017, 3, ymd(2017, 2, 3)),
            (2017, 6, ymd(2017, 3, 20)),
            (2017, 7, ymd(2017, 4, 4)),
            (2017, 12, ymd(2017, 6, 21)),
            (2017, 18, ymd(2017, 9, 23)),
            (2017, 23, ymd(2017, 12, 7)),
            (2023, 0, ymd(2022, 12, 22)),
            (2023, 3, ymd(2023, 2, 4)),
            (2023, 6, ymd(2023, 3, 21)),
            (2023, 7, ymd(2023, 4, 5)),
            (2024, 7, ymd(2024, 4, 4)),
            (2025, 0, ymd(2024, 12, 21)),
            (2025, 7, ymd(2025, 4, 4)),
            (2008, 18, ymd(2008, 9, 22)),
            (2016, 13, ymd(2016, 7, 7)),
            (2020, 16, ymd(2020, 8, 22)),
            (2022, 17, ymd(2022, 9, 7)),
        ] {
            let term = almanac.solar_term(year, index);
            assert_eq!(std, term.solar_day(), "{year} {}", term.name());
        }
    }

    #[test]
    fn index_normalization() {
        let almanac = Almanac::new();
        for (year, index, std_year, std_index) in [
            (2025, 24, 2026, 0),
            (2025, 25, 2026, 1),
            (2025, -1, 2024, 23),
            (2025, -24, 2024, 0),
            (2025, -25, 2023, 23),
        ] {
            let term = almanac.solar_term(year, index);
            assert_eq!((std_year, std_index), (term.year(), term.index()));
        }
        assert_eq!(
            almanac.solar_term(2026, 0).solar_day(),
            almanac.solar_term(2025, 24).solar_day()
        );
    }

    #[test]
    fn term_of_day() {
        let almanac = Almanac::new();
        for (day, std) in [
            (ymd(2024, 12, 21), Some("冬至")),
            (ymd(2025, 1, 5), Some("小寒")),
            (ymd(2025, 2, 3), Some("立春")),
            (ymd(2025, 2, 4), None),
            (ymd(2024, 12, 6), Some("大雪")),
            (ymd(2022, 9, 7), Some("白露")),
            (ymd(2022, 9, 8), None),
            (ymd(2020, 8, 22), Some("处暑")),
            (ymd(2020, 8, 23), None),
            (ymd(2016, 7, 6), None),
            (ymd(2016, 7, 7), Some("小暑")),
            (ymd(2008, 9, 22), Some("秋分")),
        ] {
            assert_eq!(std, almanac.solar_term_of(&day).map(|t| t.name()));
        }
    }

    #[test]
    fn whole_days() {
        let almanac = Almanac::new();
        let term = almanac.solar_term(2030, 1);
        assert_eq!(term.cursory_julian_day(), term.cursory_julian_day().round());
        assert_eq!("小寒", term.to_string());
    }
}
