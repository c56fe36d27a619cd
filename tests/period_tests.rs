use clok::models::period::{PeriodKey, PeriodKind};
use clok::utils::date::PeriodKeys;

mod common;
use common::at;

#[test]
fn test_keys_from_time_in() {
    let keys = PeriodKeys::derive(&at("2020-09-01 01:00:00"));
    assert_eq!(keys.date_key, 20200901);
    assert_eq!(keys.week_key, 35);
    assert_eq!(keys.month_key, 9);
}

#[test]
fn test_week_starts_on_sunday() {
    // 2020-01-01 is a Wednesday: week 0 until the first Sunday
    assert_eq!(PeriodKeys::derive(&at("2020-01-01 10:00:00")).week_key, 0);
    assert_eq!(PeriodKeys::derive(&at("2020-01-04 23:59:59")).week_key, 0);
    assert_eq!(PeriodKeys::derive(&at("2020-01-05 00:00:00")).week_key, 1);
    // 2023-01-01 is a Sunday
    assert_eq!(PeriodKeys::derive(&at("2023-01-01 00:00:00")).week_key, 1);
    assert_eq!(PeriodKeys::derive(&at("2020-12-31 12:00:00")).week_key, 52);
}

#[test]
fn test_parse_period_keys() {
    assert_eq!(
        PeriodKey::parse(PeriodKind::Day, Some("2020-09-01")).unwrap(),
        PeriodKey::Explicit(20200901)
    );
    assert_eq!(
        PeriodKey::parse(PeriodKind::Day, Some("20200901")).unwrap(),
        PeriodKey::Explicit(20200901)
    );
    assert_eq!(
        PeriodKey::parse(PeriodKind::Week, Some("35")).unwrap(),
        PeriodKey::Explicit(35)
    );
    assert_eq!(
        PeriodKey::parse(PeriodKind::Month, None).unwrap(),
        PeriodKey::Default
    );

    assert!(PeriodKey::parse(PeriodKind::Week, Some("54")).is_err());
    assert!(PeriodKey::parse(PeriodKind::Month, Some("0")).is_err());
    assert!(PeriodKey::parse(PeriodKind::Month, Some("june")).is_err());
    assert!(PeriodKey::parse(PeriodKind::Day, Some("2020-02-30")).is_err());
}

#[test]
fn test_default_key_resolves_to_now() {
    let now = at("2020-09-01 10:00:00");
    assert_eq!(PeriodKey::Default.resolve(PeriodKind::Day, now), 20200901);
    assert_eq!(PeriodKey::Default.resolve(PeriodKind::Week, now), 35);
    assert_eq!(PeriodKey::Default.resolve(PeriodKind::Month, now), 9);
    assert_eq!(PeriodKey::Explicit(3).resolve(PeriodKind::Month, now), 3);
}

#[test]
fn test_period_kind_from_str() {
    assert_eq!("Week".parse::<PeriodKind>().unwrap(), PeriodKind::Week);
    assert_eq!(" day ".parse::<PeriodKind>().unwrap(), PeriodKind::Day);
    assert!("year".parse::<PeriodKind>().is_err());
}
