//! 格式化农历日期

/// 汉数字，第 `1..=9` 项分别为「一」到「九」。为便于格式化日期，第 0 项为「十」。
pub const NUM_CHINESE: &[&str] = &["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];

/// 月名，不含「月」字。
const MONTH_NAMES: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
];

/// 日名的前一字，依旬分。二十、三十两日另计。
const DECADE_PREFIX: [&str; 3] = ["初", "十", "廿"];

/// 取得月名（含「月」字），负数表示闰月。
///
/// # 用例
///
/// ```
/// use festo::chinese;
///
/// assert_eq!("冬月", chinese::fmt::month(11));
/// assert_eq!("闰正月", chinese::fmt::month(-1));
/// ```
///
/// # Panics
///
/// 若月序号绝对值不在 `1..=12` 间则 panic。
pub fn month(m: i32) -> String {
    let name = match m.unsigned_abs() {
        n @ 1..=12 => MONTH_NAMES[n as usize - 1],
        n => panic!("month {n} not in 1..=12"),
    };
    let leap = if m < 0 { "闰" } else { "" };
    format!("{leap}{name}月")
}

/// 取得日名，如「初一」「十五」「廿九」「三十」。
///
/// # 用例
///
/// ```
/// use festo::chinese;
///
/// assert_eq!("初十", chinese::fmt::day(10));
/// assert_eq!("廿五", chinese::fmt::day(25));
/// assert_eq!("三十", chinese::fmt::day(30));
/// ```
///
/// # Panics
///
/// 若日序号不在 `1..=30` 间则 panic。
pub fn day(d: i32) -> String {
    if !(1..=30).contains(&d) {
        panic!("day {d} not in 1..=30");
    }
    let prefix = match d {
        20 => "二",
        30 => "三",
        _ => DECADE_PREFIX[((d - 1) / 10) as usize],
    };
    format!("{prefix}{}", NUM_CHINESE[(d % 10) as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        for (std, m) in [
            ("正月", 1),
            ("六月", 6),
            ("闰六月", -6),
            ("十月", 10),
            ("腊月", 12),
            ("闰冬月", -11),
        ] {
            assert_eq!(std, month(m));
        }
    }

    #[test]
    fn day_names() {
        let names = [1, 5, 10, 11, 15, 19, 20, 21, 29, 30].map(day);
        assert_eq!(
            "初一 初五 初十 十一 十五 十九 二十 廿一 廿九 三十",
            names.join(" ")
        );
    }

    #[test]
    #[should_panic(expected = "day 31 not in 1..=30")]
    fn day_out_of_range() {
        day(31);
    }

    #[test]
    #[should_panic(expected = "month 13 not in 1..=12")]
    fn month_out_of_range() {
        month(-13);
    }
}
