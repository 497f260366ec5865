use festo::{Almanac, Error, FestivalInfo, FestivalType, SolarDay};
use proptest::prelude::*;

fn ymd(y: i32, m: i32, d: i32) -> SolarDay {
    SolarDay::from_ymd(y, m, d).unwrap()
}

#[test]
fn new_year_day() {
    let start = ymd(2025, 1, 1);
    let festival = festo::nearest_festival(&start, 30).unwrap().unwrap();
    assert_eq!("元旦", festival.name());
    assert_eq!(0, festival.info(&start).days);
}

#[test]
fn winter_solstice_within_window() {
    let start = ymd(2024, 12, 20);
    let festival = festo::nearest_festival(&start, 5).unwrap().unwrap();
    let info = festival.info(&start);
    // 冬至 is reported by its lunar festival rule, which takes precedence
    // over the solar term of the same day.
    assert_eq!(("冬至节", 1), (info.name.as_str(), info.days));
    assert_eq!(FestivalType::Lunar, festival.kind());

    let almanac = Almanac::new();
    let term = almanac.solar_term_of(&festival.day()).unwrap();
    assert_eq!("冬至", term.name());
}

#[test]
fn new_years_eve_after_short_and_long_months() {
    let almanac = Almanac::new();
    for (year, days) in [(2025, 29), (2024, 30), (2026, 29)] {
        let last_month = almanac.lunar_month(year - 1, 12).unwrap();
        assert_eq!(days, last_month.day_count(), "{year}");
        let eve = almanac.lunar_day(year - 1, 12, days).unwrap().solar_day();
        let festival = almanac.festival_on(&eve).unwrap().unwrap();
        assert_eq!("除夕", festival.name(), "{eve}");
        assert_eq!("春节", almanac.festival_on(&eve.next(1)).unwrap().unwrap().name());
    }
    // 腊月廿九 of a 30-day month is not the eve
    let day = almanac.lunar_day(2023, 12, 29).unwrap().solar_day();
    assert_eq!(None, almanac.festival_on(&day).unwrap());
}

#[test]
fn terms_near_midnight() {
    for (start, std_day, std_name) in [
        (ymd(2022, 9, 5), ymd(2022, 9, 7), "白露"),
        (ymd(2020, 8, 21), ymd(2020, 8, 22), "处暑"),
        (ymd(2016, 7, 5), ymd(2016, 7, 7), "小暑"),
        (ymd(2008, 9, 20), ymd(2008, 9, 22), "秋分"),
    ] {
        let festival = festo::nearest_festival(&start, 5).unwrap().unwrap();
        assert_eq!(FestivalType::Term, festival.kind(), "{start}");
        assert_eq!((std_day, std_name), (festival.day(), festival.name()));
    }
}

#[test]
fn solar_festival_year_gate() {
    let almanac = Almanac::new();
    for year in [1980, 1984] {
        let day = ymd(year, 9, 10);
        let kind = almanac.festival_on(&day).unwrap().map(|f| f.kind());
        assert_ne!(Some(FestivalType::Solar), kind, "{year}");
    }
    for year in [1985, 1999, 2025] {
        let day = ymd(year, 9, 10);
        let festival = almanac.festival_on(&day).unwrap().unwrap();
        assert_eq!("教师节", festival.name(), "{year}");
    }
    // 植树节 only from 1979
    assert_eq!(None, almanac.festival_on(&ymd(1978, 3, 12)).unwrap());
    assert_eq!("植树节", almanac.festival_on(&ymd(1979, 3, 12)).unwrap().unwrap().name());
}

#[test]
fn leap_month_gating() {
    let almanac = Almanac::new();
    for year in 2015..2035 {
        let leap = almanac.leap_month(year) as i32;
        for m in 1..=12 {
            let res = almanac.lunar_month(year, -m);
            if m == leap {
                assert!(res.is_ok(), "{year} {m}");
            } else {
                assert_eq!(Err(Error::NoSuchLeapMonth { year, month: m }), res);
            }
        }
    }
}

#[test]
fn caller_record() {
    let start = ymd(2025, 6, 2);
    let info = festo::nearest_festival(&start, 60)
        .unwrap()
        .map(|f| f.info(&start))
        .unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(
        serde_json::json!({ "name": "芒种", "days": 3, "type": "Solar Term" }),
        json
    );

    let none = serde_json::to_value(FestivalInfo::none()).unwrap();
    assert_eq!(serde_json::json!({ "name": "无", "days": 0, "type": "" }), none);
}

#[test]
fn festival_serializes_day() {
    let almanac = Almanac::new();
    let festival = almanac.festival_on(&ymd(2025, 10, 1)).unwrap().unwrap();
    let json = serde_json::to_value(festival).unwrap();
    assert_eq!("国庆节", json["name"]);
    assert_eq!("Solar Festival", json["type"]);
    assert_eq!(10, json["day"]["month"]);
}

#[test]
fn time_of_day_is_ignored() {
    let start = SolarDay::from_naive(
        chrono::NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap(),
    );
    let festival = festo::nearest_festival(&start, 30).unwrap().unwrap();
    assert_eq!(("小寒", 3), (festival.name(), festival.info(&start).days));
    assert_eq!(ymd(2025, 1, 5), festival.day());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lunar_round_trip(offset in 0i32..73000) {
        let almanac = Almanac::shared();
        let solar = ymd(1901, 1, 1).next(offset);
        let lunar = almanac.lunar_day_of(&solar).unwrap();
        prop_assert_eq!(solar, lunar.solar_day());

        let again = almanac
            .lunar_day(lunar.year(), lunar.month(), lunar.day())
            .unwrap();
        prop_assert_eq!(lunar, again);
        prop_assert_eq!(solar, again.solar_day());
    }

    #[test]
    fn lunar_round_trip_all_years(offset in 0i32..3_650_000) {
        let almanac = Almanac::shared();
        let solar = ymd(1, 1, 1).next(offset);
        let lunar = almanac.lunar_day_of(&solar).unwrap();
        prop_assert_eq!(solar, lunar.solar_day());
    }

    #[test]
    fn lunar_stepping_matches_solar(offset in 0i32..36500, n in -400i32..400) {
        let almanac = Almanac::shared();
        let solar = ymd(1950, 1, 1).next(offset);
        let lunar = almanac.lunar_day_of(&solar).unwrap();
        let stepped = lunar.next(almanac, n).unwrap();
        prop_assert_eq!(solar.next(n), stepped.solar_day());
    }
}
