use crate::entity::error::ValidationError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[cfg(test)]
use chrono::Weekday::{Mon, Sun};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m";

// first_dayから見て何日目か (0..=6)
pub fn days_since_week_start(date: NaiveDate, first_day: Weekday) -> i64 {
    let day = date.weekday().num_days_from_sunday() as i64;
    let first = first_day.num_days_from_sunday() as i64;

    (day - first).rem_euclid(7)
}

// todayを含む週の先頭日(first_day)を求め、offset_weeks週ずらす
// 日付の範囲を超える場合は端に張り付く
pub fn get_week_start(today: NaiveDate, offset_weeks: i64, first_day: Weekday) -> NaiveDate {
    let start = add_days(today, -days_since_week_start(today, first_day));

    Duration::try_weeks(offset_weeks)
        .and_then(|shift| start.checked_add_signed(shift))
        .unwrap_or(if offset_weeks > 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        })
}

#[test]
fn test_get_week_start_水曜日は直前の日曜日になること() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    let actual = get_week_start(today, 0, Sun);

    assert_eq!(actual, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
}

#[test]
fn test_get_week_start_週の先頭日の場合はその日自身になること() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    let actual = get_week_start(today, 0, Sun);

    assert_eq!(actual, today);
}

#[test]
fn test_get_week_start_offset分だけ週がずれること() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    assert_eq!(
        get_week_start(today, 2, Sun),
        NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()
    );
    assert_eq!(
        get_week_start(today, -1, Sun),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
    );
}

#[test]
fn test_get_week_start_月曜始まりの場合() {
    // 2024/01/07は日曜日
    let today = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
    let actual = get_week_start(today, 0, Mon);

    assert_eq!(actual, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn test_get_week_start_常に週の先頭曜日で7日以内に収まること() {
    let first = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();

    for d in 0..60 {
        let today = first + Duration::days(d);
        let actual = get_week_start(today, 0, Sun);

        assert_eq!(actual.weekday(), Sun);
        assert!(actual <= today);
        assert!((today - actual).num_days() < 7);
    }
}

pub fn clamp_week_offset(offset: i64, min: i64, max: i64) -> i64 {
    if offset < min {
        return min;
    }
    if offset > max {
        return max;
    }

    offset
}

#[test]
fn test_clamp_week_offset_範囲内はそのまま() {
    assert_eq!(clamp_week_offset(3, 0, 4), 3);
}

#[test]
fn test_clamp_week_offset_範囲外は端に丸められること() {
    assert_eq!(clamp_week_offset(-5, 0, 4), 0);
    assert_eq!(clamp_week_offset(i64::MIN, 0, 4), 0);
    assert_eq!(clamp_week_offset(9, 0, 4), 4);
    assert_eq!(clamp_week_offset(i64::MAX, 0, 4), 4);
}

#[test]
fn test_clamp_week_offset_冪等であること() {
    for offset in [-100, -1, 0, 2, 4, 5, 100] {
        let once = clamp_week_offset(offset, 0, 4);
        assert_eq!(clamp_week_offset(once, 0, 4), once);
        assert!((0..=4).contains(&once));
    }
}

// 日付の範囲を超える場合は端に張り付く
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|shift| date.checked_add_signed(shift))
        .unwrap_or(if days > 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        })
}

#[test]
fn test_add_days_範囲を超える場合は端に張り付くこと() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    assert_eq!(add_days(date, 3), NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    assert_eq!(add_days(date, -10), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    assert_eq!(add_days(date, i64::MAX), NaiveDate::MAX);
    assert_eq!(add_days(date, 7_000_000_000), NaiveDate::MAX);
    assert_eq!(add_days(date, i64::MIN), NaiveDate::MIN);
    assert_eq!(add_days(NaiveDate::MAX, 6), NaiveDate::MAX);
}

pub fn get_week_end(week_start: NaiveDate) -> NaiveDate {
    add_days(week_start, 6)
}

// [week_start, week_start + 7日)
pub fn is_date_in_week(date: NaiveDate, week_start: NaiveDate) -> bool {
    week_start <= date && date < add_days(week_start, 7)
}

#[test]
fn test_is_date_in_week_半開区間で判定されること() {
    let week_start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

    assert!(is_date_in_week(week_start, week_start));
    assert!(is_date_in_week(
        NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
        week_start
    ));
    assert!(!is_date_in_week(
        NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
        week_start
    ));
    assert!(!is_date_in_week(
        NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        week_start
    ));
}

// baseからdateまでの週数 (端数は切り捨て、過去は負)
pub fn weeks_between(base_week_start: NaiveDate, date: NaiveDate) -> i64 {
    (date - base_week_start).num_days().div_euclid(7)
}

#[test]
fn test_weeks_between_正常系() {
    let base = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

    assert_eq!(weeks_between(base, base), 0);
    assert_eq!(
        weeks_between(base, NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()),
        0
    );
    assert_eq!(
        weeks_between(base, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()),
        1
    );
    assert_eq!(
        weeks_between(base, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()),
        -1
    );
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
        .map_err(|_| ValidationError(format!("invalid date: {:?}", s)))
}

#[test]
fn test_parse_iso_date_正常系() {
    let actual = parse_iso_date("2024-01-10");
    assert_eq!(actual, Ok(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()));
}

#[test]
fn test_parse_iso_date_異常系() {
    assert!(parse_iso_date("2024/01/10").is_err());
    assert!(parse_iso_date("").is_err());
    assert!(parse_iso_date("2024-02-30").is_err());
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn get_week_range_label(week_start: NaiveDate) -> String {
    format!(
        "{} - {}",
        format_display_date(week_start),
        format_display_date(get_week_end(week_start))
    )
}

#[test]
fn test_get_week_range_label_正常系() {
    let week_start = NaiveDate::from_ymd_opt(2024, 1, 28).unwrap();
    assert_eq!(get_week_range_label(week_start), "28.01 - 03.02");
}
