//! Deals with different time scales, specifically, conversion from TT into
//! UT (UTC or UT1) and from there into civil dates.
//!
//! Ephemeris results come out in dynamical time; calendar days are counted
//! in civil time, so every computed instant passes through [`Ut::convert`].

use std::sync::LazyLock;

use crate::date::JulianDay;

const SECONDS_PER_DAY: f64 = 86400.0;

/// TT − TAI, in seconds.
const TT_MINUS_TAI: f64 = 32.184;

/// Terrestrial time as a Julian date, the scale the ephemeris series are
/// evaluated in.
///
/// Equal to TDB to within milliseconds, well below a day boundary.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tt(pub f64);

impl From<Tai> for Tt {
    fn from(tai: Tai) -> Tt {
        Tt(tai.0 + TT_MINUS_TAI / SECONDS_PER_DAY)
    }
}

/// International atomic time as a Julian date. Leap seconds are indexed by it.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Tai(pub f64);

impl From<Tt> for Tai {
    fn from(tt: Tt) -> Tai {
        Tai(tt.0 - TT_MINUS_TAI / SECONDS_PER_DAY)
    }
}

/// [Universal time](https://en.wikipedia.org/wiki/Universal_Time), the actual
/// civil time used for determining the date at a given time point.
///
/// This is UTC from 1972-01-01T00:00Z to the expiry of the leap second table,
/// and UT1 otherwise. UT1 before 1972 follows the ΔT model of Meeus,
/// *Astronomical Algorithms*, ch. 10; after the table expires it follows a
/// long-term parabola [described here](https://astro.ukho.gov.uk/nao/lvm/),
/// shifted to join the last known offset.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Ut(pub f64);

impl Ut {
    /// Converts any scale reachable from TAI into UT.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::time_scales::{Tt, Ut};
    /// // 2017 onwards: UTC = TT - 69.184 s
    /// let ut = Ut::convert(Tt(2460000.0));
    /// assert!((ut.0 - (2460000.0 - 69.184 / 86400.0)).abs() < 1e-9);
    /// ```
    pub fn convert<T>(time: T) -> Self
    where
        T: Into<Tai>,
    {
        let tai = time.into();
        let data = &*leap_seconds::DATA;

        if tai < data.starts {
            let tt = Tt::from(tai);
            return Ut(tt.0 - delta_t::seconds(tt.0) / SECONDS_PER_DAY);
        } else if tai > data.expires {
            let diff = leap_seconds::estimate(tai) + data.c2;
            return Ut(tai.0 - diff / SECONDS_PER_DAY); // UT1, not UTC
        }

        let ls = match data.leap_seconds.partition_point(|ls| ls.tai <= tai) {
            0 => return Ut(tai.0 - 10.0 / SECONDS_PER_DAY),
            i => &data.leap_seconds[i - 1],
        };
        // UTC stands still during the inserted second.
        let inserted = ((tai.0 - ls.tai.0) * SECONDS_PER_DAY).min(1.0);
        Ut(tai.0 - (ls.delta_secs as f64 + inserted) / SECONDS_PER_DAY)
    }

    /// Returns the Julian day number (noon of the date) of the civil date at
    /// this time point, in a timezone ahead (east) of UTC by
    /// `tz_offset_minutes` minutes.
    ///
    /// For Beijing time (UTC+8), `tz_offset_minutes` should be +480.
    ///
    /// # Example
    ///
    /// ```
    /// use festo::time_scales::Ut;
    /// // 2000-01-01 20:00 UTC is already January 2 in Beijing.
    /// let ut = Ut(2451545.3333333);
    /// assert_eq!(2451545.0, ut.civil_day(0));
    /// assert_eq!(2451546.0, ut.civil_day(480));
    /// ```
    pub fn civil_day(&self, tz_offset_minutes: i32) -> f64 {
        (self.0 + tz_offset_minutes as f64 / 1440.0).round()
    }
}

mod leap_seconds {
    use super::{LazyLock, SECONDS_PER_DAY, Tai, Tt};
    use crate::date::JulianDay;

    /// Last UTC days that ended in an inserted leap second.
    pub const DATES: &[(i32, i32, i32)] = &[
        (1972, 6, 30),
        (1972, 12, 31),
        (1973, 12, 31),
        (1974, 12, 31),
        (1975, 12, 31),
        (1976, 12, 31),
        (1977, 12, 31),
        (1978, 12, 31),
        (1979, 12, 31),
        (1981, 6, 30),
        (1982, 6, 30),
        (1983, 6, 30),
        (1985, 6, 30),
        (1987, 12, 31),
        (1989, 12, 31),
        (1990, 12, 31),
        (1992, 6, 30),
        (1993, 6, 30),
        (1994, 6, 30),
        (1995, 12, 31),
        (1997, 6, 30),
        (1998, 12, 31),
        (2005, 12, 31),
        (2008, 12, 31),
        (2012, 6, 30),
        (2015, 6, 30),
        (2016, 12, 31),
    ];
    /// The table is known to be complete up to the end of this day.
    pub const DATE_EXPIRES: (i32, i32, i32) = (2025, 12, 31);

    #[derive(Debug, Clone)]
    pub struct Data {
        pub starts: Tai,
        pub leap_seconds: Vec<LeapSecond>,
        pub expires: Tai,
        pub c2: f64,
    }
    #[derive(Debug, Clone)]
    pub struct LeapSecond {
        /// TAI of 23:59:59 UTC right before the inserted second.
        pub tai: Tai,
        /// TAI − UTC before the inserted second.
        pub delta_secs: i32,
    }

    pub static DATA: LazyLock<Data> = LazyLock::new(|| {
        let starts = Tai(midnight(1972, 1, 1) + 10.0 / SECONDS_PER_DAY);
        let leap_seconds = (10..)
            .zip(DATES)
            .map(|(delta_secs, &(y, m, d))| LeapSecond {
                tai: Tai(midnight(y, m, d) + (86399 + delta_secs) as f64 / SECONDS_PER_DAY),
                delta_secs,
            })
            .collect();
        let final_delta = (DATES.len() + 10) as f64;
        let (y, m, d) = DATE_EXPIRES;
        let expires = Tai(midnight(y, m, d) + (86399.0 + final_delta) / SECONDS_PER_DAY);
        let c2 = final_delta - estimate(expires);
        Data {
            starts,
            leap_seconds,
            expires,
            c2,
        }
    });

    fn midnight(y: i32, m: i32, d: i32) -> f64 {
        JulianDay::from_ymd_hms(y, m, d, 0, 0, 0).day()
    }

    pub fn estimate<T: Into<Tt>>(tt: T) -> f64 {
        use std::f64::consts::PI;
        let tt = tt.into();
        let y = (tt.0 - 2451544.5) / 365.2425 + 2000.0;
        let t = (y - 1825.0) / 100.0;
        31.4115 * t * t + 284.8435805251424 * (2.0 * PI * (t + 0.75) / 14.0).cos()
    }
}

mod delta_t {
    /// Biennial ΔT from 1620 to 1992, in seconds.
    #[rustfmt::skip]
    const TABLE: [f64; 187] = [
        124.0, 115.0, 106.0,  98.0,  91.0,  85.0,  79.0,  74.0,  70.0,  65.0,
         62.0,  58.0,  55.0,  53.0,  50.0,  48.0,  46.0,  44.0,  42.0,  40.0,
         37.0,  35.0,  33.0,  31.0,  28.0,  26.0,  24.0,  22.0,  20.0,  18.0,
         16.0,  14.0,  13.0,  12.0,  11.0,  10.0,   9.0,   9.0,   9.0,   9.0,
          9.0,   9.0,   9.0,   9.0,  10.0,  10.0,  10.0,  10.0,  10.0,  11.0,
         11.0,  11.0,  11.0,  11.0,  11.0,  11.0,  12.0,  12.0,  12.0,  12.0,
         12.0,  12.0,  13.0,  13.0,  13.0,  13.0,  14.0,  14.0,  14.0,  15.0,
         15.0,  15.0,  15.0,  16.0,  16.0,  16.0,  16.0,  16.0,  17.0,  17.0,
         17.0,  17.0,  17.0,  17.0,  17.0,  17.0,  16.0,  16.0,  15.0,  14.0,
         13.7,  13.1,  12.7,  12.5,  12.5,  12.5,  12.5,  12.5,  12.5,  12.3,
         12.0,  11.4,  10.6,   9.6,   8.6,   7.5,   6.6,   6.0,   5.7,   5.6,
          5.7,   5.9,   6.2,   6.5,   6.8,   7.1,   7.3,   7.5,   7.7,   7.8,
          7.9,   7.5,   6.4,   5.4,   2.9,   1.6,  -1.0,  -2.7,  -3.6,  -4.7,
         -5.4,  -5.2,  -5.5,  -5.6,  -5.8,  -5.9,  -6.2,  -6.4,  -6.1,  -4.7,
         -2.7,   0.0,   2.6,   5.4,   7.7,  10.5,  13.4,  16.0,  18.2,  20.2,
         21.2,  22.4,  23.5,  23.9,  24.3,  24.0,  23.9,  23.9,  23.7,  24.0,
         24.3,  25.3,  26.2,  27.3,  28.2,  29.1,  30.0,  30.7,  31.4,  32.2,
         33.1,  34.0,  35.0,  36.5,  38.3,  40.2,  42.2,  44.5,  46.5,  48.5,
         50.5,  52.2,  53.8,  54.9,  55.8,  56.9,  58.3,
    ];
    const TABLE_START: f64 = 2312752.5; // 1620-01-01
    const TABLE_STEP: f64 = 730.5;

    /// ΔT = TT − UT in seconds at Julian day `jd`.
    pub fn seconds(jd: f64) -> f64 {
        if jd < 2067314.5 {
            // before 948, Stephenson & Houlden
            let c = (jd - 2067314.5) / 36525.0;
            1830.0 - 405.0 * c + 46.5 * c * c
        } else if jd < 2305447.5 {
            // 948..1600
            let c = (jd - 2396758.5) / 36525.0;
            22.5 * c * c
        } else {
            let i = (((jd - TABLE_START) / TABLE_STEP).max(0.0) as usize).min(TABLE.len() - 3);
            let a = TABLE[i + 1] - TABLE[i];
            let b = TABLE[i + 2] - TABLE[i + 1];
            let n = (jd - (TABLE_START + TABLE_STEP * i as f64)) / TABLE_STEP;
            TABLE[i + 1] + n / 2.0 * (a + b + n * (a - b))
        }
    }
}

/// Julian day at which `ut` falls on the civil date it belongs to, in UTC+8.
pub(crate) fn beijing_day(ut: Ut) -> JulianDay {
    JulianDay::from_day(ut.civil_day(480))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beijing_midnight() {
        // 2025-01-28 16:00 UTC is midnight of January 29 in Beijing.
        let midnight = 2460704.5 - 8.0 / 24.0;
        let tt = |utc: f64| Tt(utc + (37.0 + TT_MINUS_TAI) / SECONDS_PER_DAY);
        let before = Ut::convert(tt(midnight - 1.0 / SECONDS_PER_DAY));
        let after = Ut::convert(tt(midnight + 1.0 / SECONDS_PER_DAY));
        assert_eq!(2460704.0, before.civil_day(480));
        assert_eq!(2460705.0, after.civil_day(480));
        assert_eq!(2460704.0, after.civil_day(0));
    }

    #[test]
    fn utc_offsets() {
        // TAI − UTC was 10 s in early 1972 and 37 s from 2017 on.
        let early = Tai(2441400.0);
        assert!((Ut::convert(early).0 - (early.0 - 10.0 / 86400.0)).abs() < 1e-9);
        let late = Tai(2458000.0);
        assert!((Ut::convert(late).0 - (late.0 - 37.0 / 86400.0)).abs() < 1e-9);
    }

    #[test]
    fn continuous_after_expiry() {
        let expires = leap_seconds::DATA.expires;
        let before = Ut::convert(Tai(expires.0 - 1e-6));
        let after = Ut::convert(Tai(expires.0 + 1e-6));
        assert!((after.0 - before.0) * 86400.0 < 0.5);
    }

    #[test]
    fn before_utc() {
        // ΔT around 1900 was a couple of seconds; around 1700, about 9 s.
        assert!(delta_t::seconds(2415020.5).abs() < 5.0);
        assert!((delta_t::seconds(2341972.5) - 9.0).abs() < 1.5);
        // ancient ΔT is in the hours
        assert!(delta_t::seconds(1721423.5) > 9000.0);

        let tt = Tt(2415020.5);
        let ut = Ut::convert(tt);
        assert!(((tt.0 - ut.0) * 86400.0 - delta_t::seconds(tt.0)).abs() < 1e-3);
    }

    #[test]
    fn beijing_dates() {
        // 2024-12-21 09:20 UTC, the winter solstice, is 17:20 in Beijing.
        let ut = Ut(2460665.8889);
        assert_eq!(2460666.0, beijing_day(ut).day());
    }
}
