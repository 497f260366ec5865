//! 月相节气历表
//!
//! 历法编算只需两種天象：朔与交节。[`Ephemeris`] 规定其接口，[`Analytic`]
//! 以公开的截断级数实现：
//!
//! - 朔：Meeus, *Astronomical Algorithms*, ch. 49；
//! - 太阳视黄经：Reingold & Dershowitz, *Calendrical Calculations* 的 49 项级数，另加光行差与章动，
//!   精度约 0.001°（Meeus ch. 25 例 25.b 为 199.9074°）。
//!
//! 两者所得均为力学时，经 [`time_scales`](crate::time_scales) 转为北京时间日期。
//!
//! 所有「日」均为相对 J2000 的日数，整数值对应北京时间某日正午。

use crate::date::J2000;
use crate::time_scales::{Tt, Ut, beijing_day};

/// 朔望月平均长度（日）
pub const SYNODIC_MONTH: f64 = 29.5306;
/// 回归年平均长度（日）
pub const TROPICAL_YEAR: f64 = 365.2422;

/// 历表接口。
///
/// 输入为天象的粗略估计日（相对 J2000），输出为该天象所在北京时间日期的正午，
/// 亦相对 J2000，恒为整数值。
pub trait Ephemeris {
    /// 取得估计日所对应朔望月的合朔日。
    ///
    /// 朔望月序号为 `floor((mean_day + J2000 + 14 - 2451551) / 29.5306)`，
    /// 即距估计日最近、通常不晚于估计日的朔。
    fn new_moon(&self, mean_day: f64) -> f64;

    /// 取得估计日所对应节气的交节日。
    ///
    /// 节气序号为 `floor((mean_day + J2000 + 7 - 2451259) / (365.2422 / 24))`，
    /// 第 `k` 气即太阳视黄经到达 `15° × k` 之时。
    fn term_crossing(&self, mean_day: f64) -> f64;
}

/// 以解析级数计算的历表，无需外部数据。
///
/// # 用例
///
/// ```
/// use festo::chinese::ephemeris::{Analytic, Ephemeris};
///
/// let eph = Analytic;
/// assert_eq!(6.0, eph.new_moon(0.0)); // 2000-01-07
/// assert_eq!(9121.0, eph.term_crossing(9121.0)); // 2024-12-21 冬至
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Analytic;

impl Ephemeris for Analytic {
    fn new_moon(&self, mean_day: f64) -> f64 {
        let k = ((mean_day + J2000 + 14.0 - 2451551.0) / SYNODIC_MONTH).floor();
        civil_day(new_moon_jde(k))
    }

    fn term_crossing(&self, mean_day: f64) -> f64 {
        const STEP: f64 = TROPICAL_YEAR / 24.0;
        let k = ((mean_day + J2000 + 7.0 - 2451259.0) / STEP).floor();
        let target = (k * 15.0).rem_euclid(360.0);
        let mut t = 2451259.0 + k * STEP;
        for _ in 0..30 {
            let diff = (target - solar_longitude(t) + 540.0).rem_euclid(360.0) - 180.0;
            let dt = diff * TROPICAL_YEAR / 360.0;
            t += dt;
            if dt.abs() < 1e-8 {
                break;
            }
        }
        civil_day(t)
    }
}

/// 力学时儒略日转为北京时间日期（相对 J2000）。
fn civil_day(jde: f64) -> f64 {
    beijing_day(Ut::convert(Tt(jde))).day() - J2000
}

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// 第 `k` 个朔望月（`k = 0` 为 2000-01-06）合朔时刻，力学时儒略日。
pub fn new_moon_jde(k: f64) -> f64 {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let jde = 2451550.09766 + 29.530588861 * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let mp = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3 - 0.000000058 * t4;
    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    let om = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;

    let periodic = -0.40720 * sin_deg(mp)
        + 0.17241 * e * sin_deg(m)
        + 0.01608 * sin_deg(2.0 * mp)
        + 0.01039 * sin_deg(2.0 * f)
        + 0.00739 * e * sin_deg(mp - m)
        - 0.00514 * e * sin_deg(mp + m)
        + 0.00208 * e * e * sin_deg(2.0 * m)
        - 0.00111 * sin_deg(mp - 2.0 * f)
        - 0.00057 * sin_deg(mp + 2.0 * f)
        + 0.00056 * e * sin_deg(2.0 * mp + m)
        - 0.00042 * sin_deg(3.0 * mp)
        + 0.00042 * e * sin_deg(m + 2.0 * f)
        + 0.00038 * e * sin_deg(m - 2.0 * f)
        - 0.00024 * e * sin_deg(2.0 * mp - m)
        - 0.00017 * sin_deg(om)
        - 0.00007 * sin_deg(mp + 2.0 * m)
        + 0.00004 * sin_deg(2.0 * mp - 2.0 * f)
        + 0.00004 * sin_deg(3.0 * m)
        + 0.00003 * sin_deg(mp + m - 2.0 * f)
        + 0.00003 * sin_deg(2.0 * mp + 2.0 * f)
        - 0.00003 * sin_deg(mp + m + 2.0 * f)
        + 0.00003 * sin_deg(mp - m + 2.0 * f)
        - 0.00002 * sin_deg(mp - m - 2.0 * f)
        - 0.00002 * sin_deg(3.0 * mp + m)
        + 0.00002 * sin_deg(4.0 * mp);

    // 行星摄动
    let planetary: [(f64, f64); 14] = [
        (0.000325, 299.77 + 0.107408 * k - 0.009173 * t2),
        (0.000165, 251.88 + 0.016321 * k),
        (0.000164, 251.83 + 26.651886 * k),
        (0.000126, 349.42 + 36.412478 * k),
        (0.000110, 84.66 + 18.206239 * k),
        (0.000062, 141.74 + 53.303771 * k),
        (0.000060, 207.14 + 2.453732 * k),
        (0.000056, 154.84 + 7.306860 * k),
        (0.000047, 34.52 + 27.261239 * k),
        (0.000042, 207.19 + 0.121824 * k),
        (0.000040, 291.34 + 1.844379 * k),
        (0.000037, 161.72 + 24.198154 * k),
        (0.000035, 239.56 + 25.513099 * k),
        (0.000023, 331.55 + 3.592518 * k),
    ];
    let planetary: f64 = planetary.iter().map(|&(c, a)| c * sin_deg(a)).sum();

    jde + periodic + planetary
}

/// 太阳视黄经（度，`0..360`），输入为力学时儒略日。
pub fn solar_longitude(jde: f64) -> f64 {
    #[rustfmt::skip]
    const X: [f64; 49] = [
        403406.0, 195207.0, 119433.0, 112392.0, 3891.0, 2819.0, 1721.0, 660.0, 350.0, 334.0,
        314.0, 268.0, 242.0, 234.0, 158.0, 132.0, 129.0, 114.0, 99.0, 93.0,
        86.0, 78.0, 72.0, 68.0, 64.0, 46.0, 38.0, 37.0, 32.0, 29.0,
        28.0, 27.0, 27.0, 25.0, 24.0, 21.0, 21.0, 20.0, 18.0, 17.0,
        14.0, 13.0, 13.0, 13.0, 12.0, 10.0, 10.0, 10.0, 10.0,
    ];
    #[rustfmt::skip]
    const Z: [f64; 49] = [
        270.54861, 340.19128, 63.91854, 331.26220, 317.843, 86.631, 240.052, 310.26, 247.23, 260.87,
        297.82, 343.14, 166.79, 81.53, 3.50, 132.75, 182.95, 162.03, 29.8, 266.4,
        249.2, 157.6, 257.8, 185.1, 69.9, 8.0, 197.1, 250.4, 65.3, 162.7,
        341.5, 291.6, 98.5, 146.7, 110.0, 5.2, 342.6, 230.9, 256.1, 45.3,
        242.9, 115.2, 151.8, 285.3, 53.3, 126.6, 205.7, 85.9, 146.1,
    ];
    #[rustfmt::skip]
    const Y: [f64; 49] = [
        0.9287892, 35999.1376958, 35999.4089666, 35998.7287385, 71998.20261, 71998.4403,
        36000.35726, 71997.4812, 32964.4678, -19.4410, 445267.1117, 45036.8840, 3.1008,
        22518.4434, -19.9739, 65928.9345, 9038.0293, 3034.7684, 33718.148, 3034.448,
        -2280.773, 29929.992, 31556.493, 149.588, 9037.750, 107997.405, -4444.176, 151.771,
        67555.316, 31556.080, -4561.540, 107996.706, 1221.655, 62894.167, 31437.369,
        14578.298, -31931.757, 34777.243, 1221.999, 62894.511, -4442.039, 107997.909,
        119.066, 16859.071, -4.578, 26895.292, -39.127, 12297.536, 90073.778,
    ];

    let c = (jde - J2000) / 36525.0;
    let sum: f64 = X
        .iter()
        .zip(&Z)
        .zip(&Y)
        .map(|((x, z), y)| x * sin_deg(z + y * c))
        .sum();
    let lambda = 282.7771834 + 36000.76953744 * c + 0.000005729577951308232 * sum;
    let aberration = 0.0000974 * cos_deg(177.63 + 35999.01848 * c) - 0.005575;
    let a = 124.90 - 1934.134 * c + 0.002063 * c * c;
    let b = 201.11 + 72001.5377 * c + 0.00057 * c * c;
    let nutation = -0.004778 * sin_deg(a) - 0.0003667 * sin_deg(b);
    (lambda + aberration + nutation).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::JulianDay;
    use approx::assert_abs_diff_eq;

    fn iso(day: f64) -> String {
        let d = JulianDay::from_day(J2000 + day).solar_day();
        format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())
    }

    #[test]
    fn new_moons() {
        let eph = Analytic;
        assert_abs_diff_eq!(2451550.26, new_moon_jde(0.0), epsilon = 0.01);
        assert_eq!("2000-01-07", iso(eph.new_moon(0.0)));
        for (mean_day, std) in [
            (-25.0, "1999-12-08"),
            (35.0, "2000-02-05"),
            (9131.0, "2024-12-31"),
            (9155.0, "2025-01-29"),
        ] {
            assert_eq!(std, iso(eph.new_moon(mean_day)));
        }
    }

    #[test]
    fn solar_terms() {
        let eph = Analytic;
        for (mean_day, std) in [
            (-10.0, "1999-12-22"),
            (9121.0, "2024-12-21"),
            (9106.0, "2024-12-06"),
            // 交节时刻近子夜者
            (3187.0, "2008-09-22"), // 秋分
            (6032.0, "2016-07-07"), // 小暑
            (7539.0, "2020-08-22"), // 处暑
            (8285.0, "2022-09-07"), // 白露
        ] {
            assert_eq!(std, iso(eph.term_crossing(mean_day)));
        }
    }

    #[test]
    fn longitudes() {
        // Meeus 例 25.b：1992-10-13 0h TD
        assert_abs_diff_eq!(199.9074, solar_longitude(2448908.5), epsilon = 0.0015);
        // 2000 春分 07:35 UTC
        let tt = 2451623.816 + 64.184 / 86400.0;
        let lon = (solar_longitude(tt) + 180.0).rem_euclid(360.0) - 180.0;
        assert_abs_diff_eq!(0.0, lon, epsilon = 0.001);
    }

    #[test]
    fn results_are_whole_days() {
        let eph = Analytic;
        for day in [-700000.0, -36500.0, 0.0, 18262.5, 36525.0] {
            let nm = eph.new_moon(day);
            let tc = eph.term_crossing(day);
            assert_eq!(nm, nm.round());
            assert_eq!(tc, tc.round());
        }
    }
}
