use crate::entity::class_slot::{normalize_duration, ClassSlot, SlotId};
use crate::entity::time_of_day::TimeOfDay;
use chrono::NaiveDate;
use std::fmt;

// フォームで選べる開始時刻: 08:00から22:00まで30分刻み
const FIRST_OPTION_MINUTES: u32 = 8 * 60;
const OPTION_STEP_MINUTES: u32 = 30;
const OPTION_COUNT: u32 = 29;

// 重なり判定をどの単位でまとめるか
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GroupingKey {
    #[default]
    Subject,
    Room,
    Teacher,
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GroupingKey::Subject => write!(f, "subject"),
            GroupingKey::Room => write!(f, "room"),
            GroupingKey::Teacher => write!(f, "teacher"),
        }
    }
}

pub fn read_grouping_key(s: &str) -> Option<GroupingKey> {
    match s.trim().to_lowercase().as_str() {
        "subject" | "name" => Some(GroupingKey::Subject),
        "room" => Some(GroupingKey::Room),
        "teacher" => Some(GroupingKey::Teacher),
        _ => None,
    }
}

#[test]
fn test_read_grouping_key_正常系() {
    assert_eq!(read_grouping_key("subject"), Some(GroupingKey::Subject));
    assert_eq!(read_grouping_key("Room"), Some(GroupingKey::Room));
    assert_eq!(read_grouping_key(" teacher "), Some(GroupingKey::Teacher));
    assert_eq!(read_grouping_key("building"), None);
}

impl GroupingKey {
    pub fn key_of<'a>(&self, slot: &'a ClassSlot) -> &'a str {
        match self {
            GroupingKey::Subject => slot.get_name(),
            GroupingKey::Room => slot.get_room(),
            GroupingKey::Teacher => slot.get_teacher(),
        }
    }
}

// 作成しようとしているスロット
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub teacher: String,
    pub room: String,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub duration_hours: f64,
}

impl Candidate {
    pub fn key(&self, grouping: GroupingKey) -> &str {
        match grouping {
            GroupingKey::Subject => &self.name,
            GroupingKey::Room => &self.room,
            GroupingKey::Teacher => &self.teacher,
        }
    }

    pub fn start_minutes(&self) -> f64 {
        self.time.minutes_since_midnight() as f64
    }

    pub fn end_minutes(&self) -> f64 {
        self.start_minutes() + normalize_duration(Some(self.duration_hours)) * 60.0
    }
}

// 既存スロットが占有している区間 [start, end)
#[derive(Clone, Debug, PartialEq)]
pub struct BusyRange {
    pub slot_id: SlotId,
    pub start_minutes: f64,
    pub end_minutes: f64,
    pub label: String,
}

impl BusyRange {
    pub fn from_slot(slot: &ClassSlot) -> Self {
        let duration_minutes = normalize_duration(Some(slot.get_duration_hours())) * 60.0;

        Self {
            slot_id: slot.get_id().to_string(),
            start_minutes: slot.start_minutes(),
            end_minutes: slot.end_minutes(),
            label: format!(
                "{} - {}",
                slot.get_time(),
                slot.get_time().add_minutes_label(duration_minutes)
            ),
        }
    }

    // 端点が接するだけなら重ならない
    pub fn overlaps(&self, start_minutes: f64, end_minutes: f64) -> bool {
        start_minutes < self.end_minutes && end_minutes > self.start_minutes
    }
}

impl fmt::Display for BusyRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.slot_id)
    }
}

pub fn busy_ranges(
    existing: &[ClassSlot],
    grouping: GroupingKey,
    key: &str,
    date: NaiveDate,
) -> Vec<BusyRange> {
    existing
        .iter()
        .filter(|slot| slot.get_date() == date && grouping.key_of(slot) == key)
        .map(BusyRange::from_slot)
        .collect()
}

pub fn find_conflicts(
    candidate: &Candidate,
    existing: &[ClassSlot],
    grouping: GroupingKey,
) -> Vec<BusyRange> {
    let start = candidate.start_minutes();
    let end = candidate.end_minutes();

    busy_ranges(existing, grouping, candidate.key(grouping), candidate.date)
        .into_iter()
        .filter(|range| range.overlaps(start, end))
        .collect()
}

pub fn has_conflict(candidate: &Candidate, existing: &[ClassSlot], grouping: GroupingKey) -> bool {
    !find_conflicts(candidate, existing, grouping).is_empty()
}

pub fn is_blocked(time: TimeOfDay, duration_hours: f64, ranges: &[BusyRange]) -> bool {
    let start = time.minutes_since_midnight() as f64;
    let end = start + normalize_duration(Some(duration_hours)) * 60.0;

    ranges.iter().any(|range| range.overlaps(start, end))
}

// 表示用。同じラベルは1つにまとめる
pub fn busy_labels(ranges: &[BusyRange]) -> Vec<String> {
    let mut labels: Vec<String> = vec![];
    for range in ranges.iter() {
        if !labels.contains(&range.label) {
            labels.push(range.label.clone());
        }
    }
    labels
}

pub fn base_time_options() -> Vec<TimeOfDay> {
    (0..OPTION_COUNT)
        .filter_map(|i| TimeOfDay::from_minutes(FIRST_OPTION_MINUTES + i * OPTION_STEP_MINUTES))
        .collect()
}

// 既存スロットの開始時刻も候補に混ぜる
pub fn time_options(existing: &[ClassSlot]) -> Vec<TimeOfDay> {
    let mut options = base_time_options();
    options.extend(existing.iter().map(|slot| slot.get_time()));
    options.sort();
    options.dedup();
    options
}

pub fn first_free_time(
    options: &[TimeOfDay],
    duration_hours: f64,
    ranges: &[BusyRange],
) -> Option<TimeOfDay> {
    options
        .iter()
        .copied()
        .find(|option| !is_blocked(*option, duration_hours, ranges))
}

#[cfg(test)]
fn slot(id: &str, name: &str, date: &str, time: &str, duration_hours: f64) -> ClassSlot {
    let candidate = candidate(name, date, time, duration_hours);
    ClassSlot::new(id.to_string(), &candidate, "day".to_string())
}

#[cfg(test)]
fn candidate(name: &str, date: &str, time: &str, duration_hours: f64) -> Candidate {
    Candidate {
        name: name.to_string(),
        teacher: "Dana".to_string(),
        room: "Room 1".to_string(),
        date: crate::entity::datetime::parse_iso_date(date).unwrap(),
        time: TimeOfDay::parse(time).unwrap(),
        duration_hours,
    }
}

#[test]
fn test_has_conflict_30分重なる場合は衝突() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 1.0)];
    let b = candidate("Algebra", "2024-01-10", "10:30", 1.0);

    assert!(has_conflict(&b, &existing, GroupingKey::Subject));

    let conflicts = find_conflicts(&b, &existing, GroupingKey::Subject);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].slot_id, "a");
    assert_eq!(conflicts[0].start_minutes, 600.0);
    assert_eq!(conflicts[0].end_minutes, 660.0);
    assert_eq!(conflicts[0].label, "10:00 - 11:00");
}

#[test]
fn test_has_conflict_端点が接するだけの場合は衝突しない() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 1.0)];

    let after = candidate("Algebra", "2024-01-10", "11:00", 1.0);
    assert!(!has_conflict(&after, &existing, GroupingKey::Subject));

    let before = candidate("Algebra", "2024-01-10", "09:00", 1.0);
    assert!(!has_conflict(&before, &existing, GroupingKey::Subject));
}

#[test]
fn test_has_conflict_1分でも重なれば衝突() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 1.0)];
    let b = candidate("Algebra", "2024-01-10", "10:59", 1.0);

    assert!(has_conflict(&b, &existing, GroupingKey::Subject));
}

#[test]
fn test_has_conflict_包含される場合も衝突() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 3.0)];
    let b = candidate("Algebra", "2024-01-10", "11:00", 0.5);

    assert!(has_conflict(&b, &existing, GroupingKey::Subject));
}

#[test]
fn test_has_conflict_科目名か日付が違えば衝突しない() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 1.0)];

    let other_name = candidate("Geometry", "2024-01-10", "10:30", 1.0);
    assert!(!has_conflict(&other_name, &existing, GroupingKey::Subject));

    let other_date = candidate("Algebra", "2024-01-11", "10:30", 1.0);
    assert!(!has_conflict(&other_date, &existing, GroupingKey::Subject));
}

#[test]
fn test_has_conflict_部屋でまとめる場合は科目が違っても衝突() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 1.0)];
    let b = candidate("Geometry", "2024-01-10", "10:30", 1.0);

    assert!(!has_conflict(&b, &existing, GroupingKey::Subject));
    assert!(has_conflict(&b, &existing, GroupingKey::Room));
    assert!(has_conflict(&b, &existing, GroupingKey::Teacher));
}

#[test]
fn test_has_conflict_候補の時間数が不正な場合は1時間として扱う() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 1.0)];

    let b = candidate("Algebra", "2024-01-10", "09:30", 0.0);
    assert!(has_conflict(&b, &existing, GroupingKey::Subject));

    let c = candidate("Algebra", "2024-01-10", "09:00", -1.0);
    assert!(!has_conflict(&c, &existing, GroupingKey::Subject));
}

#[test]
fn test_has_conflict_半端な時間数も扱えること() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "10:00", 0.25)];

    let touching = candidate("Algebra", "2024-01-10", "10:15", 1.0);
    assert!(!has_conflict(&touching, &existing, GroupingKey::Subject));

    let overlapping = candidate("Algebra", "2024-01-10", "10:14", 1.0);
    assert!(has_conflict(&overlapping, &existing, GroupingKey::Subject));
}

#[test]
fn test_busy_ranges_同じ日付と科目のものだけ返すこと() {
    let existing = vec![
        slot("a", "Algebra", "2024-01-10", "10:00", 1.5),
        slot("b", "Algebra", "2024-01-11", "10:00", 1.0),
        slot("c", "Geometry", "2024-01-10", "12:00", 1.0),
        slot("d", "Algebra", "2024-01-10", "16:00", 1.0),
    ];
    let date = crate::entity::datetime::parse_iso_date("2024-01-10").unwrap();

    let actual = busy_ranges(&existing, GroupingKey::Subject, "Algebra", date);
    let ids: Vec<&str> = actual.iter().map(|r| r.slot_id.as_str()).collect();

    assert_eq!(ids, vec!["a", "d"]);
    assert_eq!(
        busy_labels(&actual),
        vec!["10:00 - 11:30".to_string(), "16:00 - 17:00".to_string()]
    );
}

#[test]
fn test_base_time_options_8時から22時まで30分刻み() {
    let options = base_time_options();

    assert_eq!(options.len(), 29);
    assert_eq!(options.first().map(|t| t.to_string()), Some("08:00".to_string()));
    assert_eq!(options.last().map(|t| t.to_string()), Some("22:00".to_string()));
}

#[test]
fn test_time_options_既存の時刻が混ざって重複しないこと() {
    let existing = vec![
        slot("a", "Algebra", "2024-01-10", "10:15", 1.0),
        slot("b", "Algebra", "2024-01-10", "10:00", 1.0),
    ];

    let options = time_options(&existing);

    assert_eq!(options.len(), 30);
    let labels: Vec<String> = options.iter().map(|t| t.to_string()).collect();
    assert_eq!(&labels[4..7], &["10:00", "10:15", "10:30"]);
}

#[test]
fn test_first_free_time_ふさがっている時間は飛ばすこと() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "08:00", 2.0)];
    let date = crate::entity::datetime::parse_iso_date("2024-01-10").unwrap();
    let ranges = busy_ranges(&existing, GroupingKey::Subject, "Algebra", date);
    let options = base_time_options();

    assert!(is_blocked(TimeOfDay::parse("09:30").unwrap(), 1.0, &ranges));
    assert!(!is_blocked(TimeOfDay::parse("10:00").unwrap(), 1.0, &ranges));
    assert_eq!(
        first_free_time(&options, 1.0, &ranges),
        TimeOfDay::parse("10:00").ok()
    );
}

#[test]
fn test_first_free_time_空きがない場合はNone() {
    let existing = vec![slot("a", "Algebra", "2024-01-10", "08:00", 15.0)];
    let date = crate::entity::datetime::parse_iso_date("2024-01-10").unwrap();
    let ranges = busy_ranges(&existing, GroupingKey::Subject, "Algebra", date);

    assert_eq!(first_free_time(&base_time_options(), 1.0, &ranges), None);
}
