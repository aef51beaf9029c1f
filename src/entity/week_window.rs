use crate::entity::datetime::{
    add_days, clamp_week_offset, get_week_end, get_week_range_label, get_week_start,
    is_date_in_week, weeks_between,
};
use chrono::{NaiveDate, Weekday};

pub const DEFAULT_MAX_WEEK_OFFSET: i64 = 4;

// 表示中の週。今週から max_offset 週先までしか動かせない
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WeekWindow {
    base_week_start: NaiveDate,
    offset: i64,
    max_offset: i64,
}

impl WeekWindow {
    pub fn new(today: NaiveDate, first_day: Weekday, max_offset: i64) -> Self {
        Self {
            base_week_start: get_week_start(today, 0, first_day),
            offset: 0,
            max_offset: max_offset.max(0),
        }
    }

    pub fn get_base_week_start(&self) -> NaiveDate {
        self.base_week_start
    }

    pub fn get_offset(&self) -> i64 {
        self.offset
    }

    pub fn get_max_offset(&self) -> i64 {
        self.max_offset
    }

    pub fn week_start(&self) -> NaiveDate {
        add_days(self.base_week_start, self.offset.saturating_mul(7))
    }

    pub fn week_end(&self) -> NaiveDate {
        get_week_end(self.week_start())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        is_date_in_week(date, self.week_start())
    }

    pub fn range_label(&self) -> String {
        get_week_range_label(self.week_start())
    }

    // 範囲外の指定はエラーにせず端に丸める
    pub fn set_offset(&mut self, offset: i64) -> i64 {
        self.offset = clamp_week_offset(offset, 0, self.max_offset);
        self.offset
    }

    pub fn next_week(&mut self) -> i64 {
        self.set_offset(self.offset.saturating_add(1))
    }

    pub fn previous_week(&mut self) -> i64 {
        self.set_offset(self.offset.saturating_sub(1))
    }

    pub fn can_go_next(&self) -> bool {
        self.offset < self.max_offset
    }

    pub fn can_go_previous(&self) -> bool {
        self.offset > 0
    }

    // 日付入力で選べる範囲
    pub fn min_date(&self) -> NaiveDate {
        self.base_week_start
    }

    pub fn max_date(&self) -> NaiveDate {
        add_days(
            self.base_week_start,
            self.max_offset.saturating_mul(7).saturating_add(6),
        )
    }

    // 丸める前の週数
    pub fn offset_for(&self, date: NaiveDate) -> i64 {
        weeks_between(self.base_week_start, date)
    }

    // dateが見える週に移動する。範囲外なら端の週で止まり false を返す
    pub fn reveal(&mut self, date: NaiveDate) -> bool {
        self.set_offset(self.offset_for(date));
        self.contains(date)
    }
}

#[cfg(test)]
fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_new_今日を含む週が表示されること() {
    let window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);

    assert_eq!(window.week_start(), ymd(2024, 1, 7));
    assert_eq!(window.week_end(), ymd(2024, 1, 13));
    assert!(window.contains(ymd(2024, 1, 10)));
    assert!(!window.contains(ymd(2024, 1, 14)));
    assert_eq!(window.range_label(), "07.01 - 13.01");
}

#[test]
fn test_set_offset_範囲外は丸められること() {
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);

    assert_eq!(window.set_offset(10), 4);
    assert_eq!(window.week_start(), ymd(2024, 2, 4));
    assert_eq!(window.set_offset(-3), 0);
    assert_eq!(window.set_offset(i64::MAX), 4);
}

#[test]
fn test_next_week_上限で止まること() {
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 2);

    assert!(!window.can_go_previous());
    assert_eq!(window.previous_week(), 0);
    assert_eq!(window.next_week(), 1);
    assert_eq!(window.next_week(), 2);
    assert!(!window.can_go_next());
    assert_eq!(window.next_week(), 2);
    assert!(window.can_go_previous());
}

#[test]
fn test_min_date_max_date_正常系() {
    let window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);

    assert_eq!(window.min_date(), ymd(2024, 1, 7));
    assert_eq!(window.max_date(), ymd(2024, 2, 10));
}

#[test]
fn test_reveal_範囲内の日付の週に移動すること() {
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);

    assert!(window.reveal(ymd(2024, 1, 24)));
    assert_eq!(window.get_offset(), 2);
}

#[test]
fn test_reveal_範囲外の日付は端の週で止まること() {
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);

    assert!(!window.reveal(ymd(2024, 6, 1)));
    assert_eq!(window.get_offset(), 4);

    assert!(!window.reveal(ymd(2023, 12, 1)));
    assert_eq!(window.get_offset(), 0);
}

#[test]
fn test_new_負の上限は0として扱う() {
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, -1);

    assert_eq!(window.get_max_offset(), 0);
    assert_eq!(window.next_week(), 0);
}

#[test]
fn test_week_start_大きなmax_offsetでも日付の端で止まること() {
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 1_000_000_000);

    assert_eq!(window.set_offset(i64::MAX), 1_000_000_000);
    assert_eq!(window.week_start(), NaiveDate::MAX);
    assert_eq!(window.week_end(), NaiveDate::MAX);
    assert_eq!(window.max_date(), NaiveDate::MAX);
    assert!(!window.contains(ymd(2024, 1, 10)));

    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, i64::MAX);
    assert_eq!(window.next_week(), 1);
    assert_eq!(window.week_start(), ymd(2024, 1, 14));
    assert_eq!(window.max_date(), NaiveDate::MAX);
}
