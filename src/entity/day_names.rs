use crate::entity::datetime::add_days;
use crate::entity::error::ValidationError;
use chrono::{Datelike, NaiveDate};

pub const HEBREW_DAY_NAMES: [&str; 7] = ["ראשון", "שני", "שלישי", "רביעי", "חמישי", "שישי", "שבת"];

// 曜日名が引けなかった時の表示用
pub const UNKNOWN_DAY_LABEL: &str = "יום";

// 日曜始まりの曜日名テーブル
#[derive(Clone, Debug, PartialEq)]
pub struct DayNames {
    names: Vec<String>,
}

impl DayNames {
    pub fn new(names: Vec<String>) -> Result<Self, ValidationError> {
        if names.len() != 7 {
            return Err(ValidationError(format!(
                "day name table needs 7 entries, got {}",
                names.len()
            )));
        }

        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ValidationError(format!("day name #{} is empty", i)));
            }
            if names[..i].contains(name) {
                return Err(ValidationError(format!("duplicate day name: {}", name)));
            }
        }

        Ok(Self { names })
    }

    pub fn hebrew() -> Self {
        Self {
            names: HEBREW_DAY_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn get_names(&self) -> &[String] {
        &self.names
    }

    pub fn name_of(&self, date: NaiveDate) -> String {
        let index = date.weekday().num_days_from_sunday() as usize;

        self.names
            .get(index)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_DAY_LABEL.to_string())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    // week_startから始まる7日間のうち、nameの曜日に当たる日付
    pub fn date_for(&self, week_start: NaiveDate, name: &str) -> Option<NaiveDate> {
        let index = self.index_of(name)? as i64;
        let first = week_start.weekday().num_days_from_sunday() as i64;

        Some(add_days(week_start, (index - first).rem_euclid(7)))
    }
}

impl Default for DayNames {
    fn default() -> Self {
        Self::hebrew()
    }
}

#[test]
fn test_name_of_日付から曜日名を引けること() {
    let names = DayNames::hebrew();

    // 2024/01/10は水曜日
    let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
    assert_eq!(names.name_of(date), "רביעי");

    let date = NaiveDate::from_ymd_opt(2024, 1, 13).unwrap();
    assert_eq!(names.name_of(date), "שבת");
}

#[test]
fn test_date_for_日曜始まりの週() {
    let names = DayNames::hebrew();
    let week_start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

    assert_eq!(
        names.date_for(week_start, "ראשון"),
        Some(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())
    );
    assert_eq!(
        names.date_for(week_start, "שישי"),
        Some(NaiveDate::from_ymd_opt(2024, 1, 12).unwrap())
    );
    assert_eq!(names.date_for(week_start, "Someday"), None);
}

#[test]
fn test_date_for_月曜始まりの週では日曜日が最後になること() {
    let names = DayNames::hebrew();
    let week_start = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();

    assert_eq!(
        names.date_for(week_start, "ראשון"),
        Some(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap())
    );
    assert_eq!(
        names.date_for(week_start, "שני"),
        Some(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
    );
}

#[test]
fn test_new_7個でない場合はエラー() {
    let actual = DayNames::new(vec!["Sun".to_string(), "Mon".to_string()]);
    assert!(actual.is_err());
}

#[test]
fn test_new_重複がある場合はエラー() {
    let names = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Fri"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(DayNames::new(names).is_err());
}

#[test]
fn test_new_正常系() {
    let names: Vec<String> = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let actual = DayNames::new(names).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
    assert_eq!(actual.name_of(date), "Mon");
    assert!(actual.is_canonical("Sat"));
    assert!(!actual.is_canonical("ראשון"));
}
