use crate::application::config::{read_weekday, CalendarConfig};
use crate::application::error::FixtureError;
use crate::entity::class_slot::ClassSlot;
use crate::entity::conflict::{read_grouping_key, Candidate};
use crate::entity::datetime::parse_iso_date;
use crate::entity::day_names::DayNames;
use crate::entity::student::{read_payment_method, Student};
use crate::entity::time_of_day::TimeOfDay;
use chrono::NaiveDate;
use log::warn;
use yaml_rust::Yaml;

#[cfg(test)]
use yaml_rust::YamlLoader;

fn yaml_f64(yaml: &Yaml) -> Option<f64> {
    yaml.as_f64().or_else(|| yaml.as_i64().map(|i| i as f64))
}

fn yaml_string(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Real(r) => Some(r.clone()),
        _ => None,
    }
}

fn yaml_opt_string(yaml: &Yaml) -> Option<String> {
    yaml_string(yaml).filter(|s| !s.trim().is_empty())
}

fn required_string(yaml: &Yaml, field: &str, record: &str) -> Result<String, FixtureError> {
    yaml_opt_string(&yaml[field]).ok_or_else(|| FixtureError::MissingField {
        record: record.to_string(),
        field: field.to_string(),
    })
}

pub fn yaml_to_config(yaml: &Yaml) -> Result<CalendarConfig, FixtureError> {
    let mut config = CalendarConfig::default();
    let invalid = |message: String| FixtureError::InvalidValue {
        record: "config".to_string(),
        message,
    };

    if !yaml["max_week_offset"].is_badvalue() {
        let max = yaml["max_week_offset"]
            .as_i64()
            .filter(|v| *v >= 0)
            .ok_or_else(|| invalid("max_week_offset must be a non-negative integer".to_string()))?;
        config.max_week_offset = max;
    }

    if let Some(s) = yaml["first_day_of_week"].as_str() {
        config.first_day_of_week =
            read_weekday(s).ok_or_else(|| invalid(format!("unknown weekday: {}", s)))?;
    }

    if let Some(s) = yaml["grouping_key"].as_str() {
        config.grouping_key =
            read_grouping_key(s).ok_or_else(|| invalid(format!("unknown grouping key: {}", s)))?;
    }

    if let Some(s) = yaml_opt_string(&yaml["default_room"]) {
        config.default_room = s;
    }

    if let Some(names_yaml) = yaml["day_names"].as_vec() {
        let names: Vec<String> = names_yaml.iter().filter_map(yaml_string).collect();
        config.day_names = DayNames::new(names).map_err(|err| invalid(err.to_string()))?;
    }

    Ok(config)
}

#[test]
fn test_yaml_to_config_キーが無い場合はデフォルト() {
    let docs = YamlLoader::load_from_str("other: 1").unwrap();
    let actual = yaml_to_config(&docs[0]).unwrap();

    assert_eq!(actual, CalendarConfig::default());
}

#[test]
fn test_yaml_to_config_正常系() {
    let s = "
max_week_offset: 2
first_day_of_week: Mon
grouping_key: room
default_room: 'Room 7'
day_names: [Sun, Mon, Tue, Wed, Thu, Fri, Sat]
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_config(&docs[0]).unwrap();

    assert_eq!(actual.max_week_offset, 2);
    assert_eq!(actual.first_day_of_week, chrono::Weekday::Mon);
    assert_eq!(actual.grouping_key, crate::entity::conflict::GroupingKey::Room);
    assert_eq!(actual.default_room, "Room 7");
    assert_eq!(actual.day_names.get_names()[1], "Mon");
}

#[test]
fn test_yaml_to_config_不正な値はエラー() {
    for s in [
        "max_week_offset: -1",
        "max_week_offset: soon",
        "first_day_of_week: Caturday",
        "grouping_key: building",
        "day_names: [Sun, Mon]",
    ] {
        let docs = YamlLoader::load_from_str(s).unwrap();
        assert!(yaml_to_config(&docs[0]).is_err(), "{}", s);
    }
}

pub fn yaml_to_student(yaml: &Yaml) -> Result<Student, FixtureError> {
    let id = required_string(yaml, "id", "student")?;
    let record = format!("student {}", id);
    let full_name = required_string(yaml, "full_name", &record)?;
    let phone = yaml_string(&yaml["phone"]).unwrap_or_default();

    Ok(Student {
        first_name: yaml_opt_string(&yaml["first_name"]),
        last_name: yaml_opt_string(&yaml["last_name"]),
        email: yaml_opt_string(&yaml["email"]),
        parent_name: yaml_opt_string(&yaml["parent_name"]),
        parent_phone: yaml_opt_string(&yaml["parent_phone"]),
        hours: yaml_f64(&yaml["hours"]).unwrap_or(0.0),
        balance: yaml_f64(&yaml["balance"]).unwrap_or(0.0),
        last_payment_method: yaml["last_payment_method"]
            .as_str()
            .and_then(read_payment_method),
        ..Student::new(id, full_name, phone)
    })
}

#[test]
fn test_yaml_to_student_正常系() {
    let s = "
id: s1
full_name: 'Ori Levi'
phone: '050-1112233'
email: ori@example.com
hours: 42
balance: 350.5
last_payment_method: cash
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_student(&docs[0]).unwrap();

    assert_eq!(actual.id, "s1");
    assert_eq!(actual.full_name, "Ori Levi");
    assert_eq!(actual.email, Some("ori@example.com".to_string()));
    assert_eq!(actual.hours, 42.0);
    assert_eq!(actual.balance, 350.5);
    assert_eq!(
        actual.last_payment_method,
        Some(crate::entity::student::PaymentMethod::Cash)
    );
}

#[test]
fn test_yaml_to_student_名前が無い場合はエラー() {
    let docs = YamlLoader::load_from_str("id: s1\nphone: '050'").unwrap();
    let actual = yaml_to_student(&docs[0]);

    assert!(matches!(actual, Err(FixtureError::MissingField { .. })));
}

// dateが無い場合はdayの曜日を基準週の中で割り当てる
pub fn yaml_to_class_slot(
    yaml: &Yaml,
    config: &CalendarConfig,
    base_week_start: NaiveDate,
) -> Result<ClassSlot, FixtureError> {
    let id = required_string(yaml, "id", "class")?;
    let record = format!("class {}", id);
    let invalid = |message: String| FixtureError::InvalidValue {
        record: record.clone(),
        message,
    };

    let name = required_string(yaml, "name", &record)?;
    let time_str = required_string(yaml, "time", &record)?;
    let time = TimeOfDay::parse(&time_str).map_err(|err| invalid(err.to_string()))?;

    let day_label = yaml_opt_string(&yaml["day"]);
    let date = match yaml_opt_string(&yaml["date"]) {
        Some(s) => parse_iso_date(&s).map_err(|err| invalid(err.to_string()))?,
        None => day_label
            .as_deref()
            .and_then(|day| config.day_names.date_for(base_week_start, day))
            .ok_or_else(|| FixtureError::MissingField {
                record: record.clone(),
                field: "date".to_string(),
            })?,
    };

    let candidate = Candidate {
        name,
        teacher: yaml_string(&yaml["teacher"]).unwrap_or_default(),
        room: yaml_opt_string(&yaml["room"]).unwrap_or_else(|| config.default_room.clone()),
        date,
        time,
        duration_hours: yaml_f64(&yaml["duration_hours"]).unwrap_or(0.0),
    };

    let students: Vec<String> = yaml["students"]
        .as_vec()
        .map(|v| v.iter().filter_map(yaml_string).collect())
        .unwrap_or_default();

    let derived_day = config.day_names.name_of(date);
    if let Some(day) = day_label.as_deref() {
        if config.day_names.is_canonical(day) && day != derived_day {
            warn!(
                "{}: day {} does not match {}, using {}",
                record, day, date, derived_day
            );
        }
    }

    let slot = ClassSlot::new(id, &candidate, derived_day).with_students(students);

    // 曜日名でない既存データのラベルだけはそのまま残す
    Ok(match day_label {
        Some(day) if !config.day_names.is_canonical(&day) => slot.with_day_label(day),
        _ => slot,
    })
}

#[cfg(test)]
fn base_week_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
}

#[test]
fn test_yaml_to_class_slot_dateが無い場合は基準週の曜日に割り当てられること() {
    let s = "
id: c2
name: 'Ulpan B'
teacher: 'Dani Bar'
day: שני
time: '12:30'
room: 'Room 1'
students: [s4, s5, s4]
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual =
        yaml_to_class_slot(&docs[0], &CalendarConfig::default(), base_week_start()).unwrap();

    assert_eq!(actual.get_date(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    assert_eq!(actual.get_day(), "שני");
    assert_eq!(actual.get_time().to_string(), "12:30");
    assert_eq!(actual.get_duration_hours(), 1.0);
    assert_eq!(actual.get_students(), &["s4".to_string(), "s5".to_string()]);
}

#[test]
fn test_yaml_to_class_slot_dateがある場合はそちらが優先されること() {
    let s = "
id: c9
name: 'Algebra'
date: '2024-01-10'
time: '10:00'
duration_hours: 1.5
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual =
        yaml_to_class_slot(&docs[0], &CalendarConfig::default(), base_week_start()).unwrap();

    assert_eq!(actual.get_date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert_eq!(actual.get_day(), "רביעי");
    assert_eq!(actual.get_duration_hours(), 1.5);
    assert_eq!(actual.get_room(), "חדר 1");
}

#[test]
fn test_yaml_to_class_slot_既存データの曜日表記は保持されること() {
    let s = "
id: c9
name: 'Algebra'
day: 'Makeup'
date: '2024-01-10'
time: '10:00'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual =
        yaml_to_class_slot(&docs[0], &CalendarConfig::default(), base_week_start()).unwrap();

    assert_eq!(actual.get_day(), "Makeup");
}

#[test]
fn test_yaml_to_class_slot_曜日が日付と食い違う場合は日付から求めること() {
    // 2024/01/10は水曜日
    let s = "
id: c9
name: 'Algebra'
day: 'שני'
date: '2024-01-10'
time: '10:00'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let config = CalendarConfig::default();
    let actual = yaml_to_class_slot(&docs[0], &config, base_week_start()).unwrap();

    assert_eq!(actual.get_day(), "רביעי");
    assert_eq!(actual.get_day(), config.day_names.name_of(actual.get_date()));

    let slots = vec![actual];
    let window = crate::entity::week_window::WeekWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        chrono::Weekday::Sun,
        4,
    );
    let buckets = crate::entity::calendar::project_week(&slots, &window, &config.day_names);
    let wednesday = buckets.iter().find(|b| b.day == "רביעי").unwrap();
    let monday = buckets.iter().find(|b| b.day == "שני").unwrap();

    assert_eq!(wednesday.slots.len(), 1);
    assert_eq!(wednesday.date, NaiveDate::from_ymd_opt(2024, 1, 10));
    assert!(monday.slots.is_empty());
}

#[test]
fn test_yaml_to_class_slot_日付も曜日も引けない場合はエラー() {
    let s = "
id: c9
name: 'Algebra'
day: 'Makeup'
time: '10:00'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_class_slot(&docs[0], &CalendarConfig::default(), base_week_start());

    assert!(matches!(actual, Err(FixtureError::MissingField { .. })));
}

#[test]
fn test_yaml_to_class_slot_時刻が不正な場合はエラー() {
    let s = "
id: c9
name: 'Algebra'
date: '2024-01-10'
time: '25:00'
";
    let docs = YamlLoader::load_from_str(s).unwrap();
    let actual = yaml_to_class_slot(&docs[0], &CalendarConfig::default(), base_week_start());

    assert!(matches!(actual, Err(FixtureError::InvalidValue { .. })));
}
