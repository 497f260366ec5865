//! 节日表
//!
//! 公历、农历节日各以一个定长记录串编入，`@` 分隔记录：
//!
//! - 公历：`序号(2) 0 月(2) 日(2) 起始年`，该年起方有此节；
//! - 农历：`序号(2) 类型(1) …`，类型 0 后接 `月(2) 日(2)`，类型 1 后接节气序号(2)，
//!   类型 2 为除夕，无后续字段。
//!
//! 记录串在首次使用时解析为下列规则。

use std::sync::LazyLock;

use crate::date::SolarDay;

const SOLAR_NAMES: [&str; 10] = [
    "元旦",
    "三八妇女节",
    "植树节",
    "五一劳动节",
    "五四青年节",
    "六一儿童节",
    "建党节",
    "八一建军节",
    "教师节",
    "国庆节",
];

const SOLAR_DATA: &str = "@00001011950@01003081950@02003121979@03005011950@04005041950\
@05006011950@06007011941@07008011933@08009101985@09010011950";

const LUNAR_NAMES: [&str; 13] = [
    "春节",
    "元宵节",
    "龙头节",
    "上巳节",
    "清明节",
    "端午节",
    "七夕节",
    "中元节",
    "中秋节",
    "重阳节",
    "冬至节",
    "腊八节",
    "除夕",
];

const LUNAR_DATA: &str = "@0000101@0100115@0200202@0300303@04107@0500505@0600707@0700715\
@0800815@0900909@10124@1101208@122";

/// 公历节日：每年某月某日，自起始年起。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolarRule {
    pub name: &'static str,
    pub month: i32,
    pub day: i32,
    pub start_year: i32,
}

impl SolarRule {
    pub fn matches(&self, day: &SolarDay) -> bool {
        day.month() == self.month && day.day() == self.day && day.year() >= self.start_year
    }
}

/// 农历节日的定日方式
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LunarRule {
    /// 农历某月某日，月序号不含闰月。
    Date { month: i32, day: i32 },
    /// 某节气交节之日，序号见 [`term::NAMES`](crate::chinese::term::NAMES)。
    Term { index: i32 },
    /// 正月初一前一日。
    Eve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunarEntry {
    pub name: &'static str,
    pub rule: LunarRule,
}

/// 全部公历节日，依记录顺序。
pub fn solar_rules() -> &'static [SolarRule] {
    static RULES: LazyLock<Vec<SolarRule>> = LazyLock::new(|| {
        parse_solar(&SOLAR_NAMES, SOLAR_DATA)
            .unwrap_or_else(|e| panic!("error parsing solar festival data: {e}"))
    });
    &RULES
}

/// 全部农历节日，依记录顺序。
pub fn lunar_rules() -> &'static [LunarEntry] {
    static RULES: LazyLock<Vec<LunarEntry>> = LazyLock::new(|| {
        parse_lunar(&LUNAR_NAMES, LUNAR_DATA)
            .unwrap_or_else(|e| panic!("error parsing lunar festival data: {e}"))
    });
    &RULES
}

fn records(data: &'static str) -> impl Iterator<Item = (usize, &'static str)> {
    data.split('@').skip(1).enumerate()
}

fn field(record: usize, text: &str, range: std::ops::Range<usize>) -> Result<i32, CatalogError> {
    text.get(range)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CatalogError::new(record, text, "missing or non-numeric field"))
}

fn name(
    names: &[&'static str],
    record: usize,
    text: &str,
) -> Result<&'static str, CatalogError> {
    let index = field(record, text, 0..2)?;
    usize::try_from(index)
        .ok()
        .and_then(|i| names.get(i).copied())
        .ok_or_else(|| CatalogError::new(record, text, "name index out of range"))
}

fn parse_solar(
    names: &[&'static str],
    data: &'static str,
) -> Result<Vec<SolarRule>, CatalogError> {
    records(data)
        .map(|(record, text)| {
            if text.get(2..3) != Some("0") || text.len() < 8 {
                return Err(CatalogError::new(record, text, "malformed solar record"));
            }
            Ok(SolarRule {
                name: name(names, record, text)?,
                month: field(record, text, 3..5)?,
                day: field(record, text, 5..7)?,
                start_year: field(record, text, 7..text.len())?,
            })
        })
        .collect()
}

fn parse_lunar(
    names: &[&'static str],
    data: &'static str,
) -> Result<Vec<LunarEntry>, CatalogError> {
    records(data)
        .map(|(record, text)| {
            let rule = match (text.get(2..3), text.len()) {
                (Some("0"), 7) => LunarRule::Date {
                    month: field(record, text, 3..5)?,
                    day: field(record, text, 5..7)?,
                },
                (Some("1"), 5) => LunarRule::Term {
                    index: field(record, text, 3..5)?,
                },
                (Some("2"), 3) => LunarRule::Eve,
                _ => return Err(CatalogError::new(record, text, "malformed lunar record")),
            };
            Ok(LunarEntry {
                name: name(names, record, text)?,
                rule,
            })
        })
        .collect()
}

/// 节日记录串有误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {record} ({text:?}): {reason}")]
pub struct CatalogError {
    pub record: usize,
    pub text: String,
    pub reason: &'static str,
}

impl CatalogError {
    fn new(record: usize, text: &str, reason: &'static str) -> Self {
        Self {
            record,
            text: text.to_owned(),
            reason,
        }
    }
}
