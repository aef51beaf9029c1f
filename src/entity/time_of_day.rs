use crate::entity::error::ValidationError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const MINUTES_PER_DAY: u32 = 24 * 60;

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("invalid time pattern"))
}

// 日付とは独立した時刻。0時からの経過分で持つ
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }

        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }

        Some(Self { minutes })
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let err = || ValidationError(format!("invalid time: {:?}", s));

        let caps = time_pattern().captures(s.trim()).ok_or_else(err)?;
        let hour: u32 = caps[1].parse().map_err(|_| err())?;
        let minute: u32 = caps[2].parse().map_err(|_| err())?;

        Self::new(hour, minute).ok_or_else(err)
    }

    pub fn get_hour(&self) -> u32 {
        self.minutes / 60
    }

    pub fn get_minute(&self) -> u32 {
        self.minutes % 60
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.minutes
    }

    // 日を跨いだ場合は0時から数え直す
    pub fn add_minutes_label(&self, minutes_to_add: f64) -> String {
        let total = (self.minutes as f64 + minutes_to_add).round() as i64;
        let wrapped = total.rem_euclid(MINUTES_PER_DAY as i64) as u32;

        format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.get_hour(), self.get_minute())
    }
}

#[test]
fn test_parse_ゼロ埋めされた時刻() {
    let actual = TimeOfDay::parse("10:30").unwrap();

    assert_eq!(actual.get_hour(), 10);
    assert_eq!(actual.get_minute(), 30);
    assert_eq!(actual.minutes_since_midnight(), 630);
}

#[test]
fn test_parse_時が1桁の場合もパーズできること() {
    let actual = TimeOfDay::parse("9:05").unwrap();

    assert_eq!(actual, TimeOfDay::new(9, 5).unwrap());
    assert_eq!(actual.to_string(), "09:05");
}

#[test]
fn test_parse_異常系() {
    assert!(TimeOfDay::parse("").is_err());
    assert!(TimeOfDay::parse("24:00").is_err());
    assert!(TimeOfDay::parse("10:60").is_err());
    assert!(TimeOfDay::parse("10:5").is_err());
    assert!(TimeOfDay::parse("ten").is_err());
}

#[test]
fn test_ord_ゼロ埋め文字列の辞書順と一致すること() {
    let mut times = vec![
        TimeOfDay::parse("18:00").unwrap(),
        TimeOfDay::parse("09:00").unwrap(),
        TimeOfDay::parse("12:30").unwrap(),
    ];
    times.sort();

    let labels: Vec<String> = times.iter().map(|t| t.to_string()).collect();
    let mut expected = labels.clone();
    expected.sort();

    assert_eq!(labels, expected);
    assert_eq!(labels, vec!["09:00", "12:30", "18:00"]);
}

#[test]
fn test_add_minutes_label_正常系() {
    let time = TimeOfDay::parse("10:00").unwrap();

    assert_eq!(time.add_minutes_label(90.0), "11:30");
    assert_eq!(time.add_minutes_label(30.0), "10:30");
}

#[test]
fn test_add_minutes_label_日を跨ぐ場合() {
    let time = TimeOfDay::parse("23:30").unwrap();
    assert_eq!(time.add_minutes_label(60.0), "00:30");
}
