use crate::entity::conflict::Candidate;
use crate::entity::error::ValidationError;
use crate::entity::time_of_day::TimeOfDay;
use chrono::NaiveDate;

pub type SlotId = String;
pub type StudentId = String;

pub const DEFAULT_DURATION_HOURS: f64 = 1.0;

// 未指定・0以下・NaNは1時間とみなす
pub fn normalize_duration(duration_hours: Option<f64>) -> f64 {
    match duration_hours {
        Some(d) if d > 0.0 && d.is_finite() => d,
        _ => DEFAULT_DURATION_HOURS,
    }
}

#[test]
fn test_normalize_duration_正の値はそのまま() {
    assert_eq!(normalize_duration(Some(1.5)), 1.5);
    assert_eq!(normalize_duration(Some(0.25)), 0.25);
}

#[test]
fn test_normalize_duration_不正な値は1時間になること() {
    assert_eq!(normalize_duration(None), 1.0);
    assert_eq!(normalize_duration(Some(0.0)), 1.0);
    assert_eq!(normalize_duration(Some(-2.0)), 1.0);
    assert_eq!(normalize_duration(Some(f64::NAN)), 1.0);
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassSlot {
    id: SlotId,
    name: String,
    teacher: String,
    // dateから導出した曜日名のキャッシュ
    day: String,
    date: NaiveDate,
    time: TimeOfDay,
    duration_hours: f64,
    room: String,
    students: Vec<StudentId>,
}

impl ClassSlot {
    pub fn new(id: SlotId, candidate: &Candidate, day: String) -> Self {
        Self {
            id,
            name: candidate.name.clone(),
            teacher: candidate.teacher.clone(),
            day,
            date: candidate.date,
            time: candidate.time,
            duration_hours: normalize_duration(Some(candidate.duration_hours)),
            room: candidate.room.clone(),
            students: vec![],
        }
    }

    pub fn with_students(mut self, students: Vec<StudentId>) -> Self {
        self.students = vec![];
        for student_id in students {
            self.add_student(student_id);
        }
        self
    }

    // 既存データの曜日表記をそのまま使う場合のみ
    pub fn with_day_label(mut self, day: String) -> Self {
        self.day = day;
        self
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_teacher(&self) -> &str {
        &self.teacher
    }

    pub fn get_day(&self) -> &str {
        &self.day
    }

    pub fn get_date(&self) -> NaiveDate {
        self.date
    }

    pub fn get_time(&self) -> TimeOfDay {
        self.time
    }

    pub fn get_duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub fn get_room(&self) -> &str {
        &self.room
    }

    pub fn get_students(&self) -> &[StudentId] {
        &self.students
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.students.iter().any(|s| s == student_id)
    }

    pub fn start_minutes(&self) -> f64 {
        self.time.minutes_since_midnight() as f64
    }

    pub fn end_minutes(&self) -> f64 {
        self.start_minutes() + normalize_duration(Some(self.duration_hours)) * 60.0
    }

    // 既に居る場合は何もしない
    pub fn add_student(&mut self, student_id: StudentId) -> bool {
        if self.has_student(&student_id) {
            return false;
        }

        self.students.push(student_id);
        true
    }

    pub fn remove_student(&mut self, student_id: &str) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s != student_id);

        self.students.len() != before
    }
}

#[cfg(test)]
fn sample_candidate() -> Candidate {
    Candidate {
        name: "Algebra".to_string(),
        teacher: "Dana".to_string(),
        room: "Room 1".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        time: TimeOfDay::parse("10:00").unwrap(),
        duration_hours: 1.5,
    }
}

#[test]
fn test_new_区間が分単位で計算されること() {
    let slot = ClassSlot::new("c1".to_string(), &sample_candidate(), "Wed".to_string());

    assert_eq!(slot.start_minutes(), 600.0);
    assert_eq!(slot.end_minutes(), 690.0);
    assert!(slot.get_students().is_empty());
}

#[test]
fn test_with_students_重複した生徒は1人にまとめられること() {
    let slot = ClassSlot::new("c1".to_string(), &sample_candidate(), "Wed".to_string())
        .with_students(vec![
            "s1".to_string(),
            "s2".to_string(),
            "s1".to_string(),
        ]);

    assert_eq!(slot.get_students(), &["s1".to_string(), "s2".to_string()]);
}

#[test]
fn test_add_student_2回追加しても1人だけになること() {
    let mut slot = ClassSlot::new("c1".to_string(), &sample_candidate(), "Wed".to_string());

    assert!(slot.add_student("s1".to_string()));
    assert!(!slot.add_student("s1".to_string()));
    assert_eq!(slot.get_students().len(), 1);
}

#[test]
fn test_remove_student_居ない生徒の場合はfalse() {
    let mut slot = ClassSlot::new("c1".to_string(), &sample_candidate(), "Wed".to_string())
        .with_students(vec!["s1".to_string()]);

    assert!(!slot.remove_student("s9"));
    assert!(slot.remove_student("s1"));
    assert!(!slot.has_student("s1"));
}

// 管理者のクラス追加フォームから来る入力
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotRequest {
    pub name: String,
    pub teacher: String,
    pub room: String,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeOfDay>,
    pub duration_hours: Option<f64>,
}

impl SlotRequest {
    pub fn validate(&self, default_room: &str) -> Result<Candidate, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::missing_field("name"));
        }

        let teacher = self.teacher.trim();
        if teacher.is_empty() {
            return Err(ValidationError::missing_field("teacher"));
        }

        let date = self.date.ok_or_else(|| ValidationError::missing_field("date"))?;
        let time = self.time.ok_or_else(|| ValidationError::missing_field("time"))?;

        let room = match self.room.trim() {
            "" => default_room.to_string(),
            r => r.to_string(),
        };

        Ok(Candidate {
            name: name.to_string(),
            teacher: teacher.to_string(),
            room,
            date,
            time,
            duration_hours: normalize_duration(self.duration_hours),
        })
    }
}

#[cfg(test)]
fn sample_request() -> SlotRequest {
    SlotRequest {
        name: "Algebra".to_string(),
        teacher: "Dana".to_string(),
        room: "".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 10),
        time: TimeOfDay::new(10, 0),
        duration_hours: None,
    }
}

#[test]
fn test_validate_部屋と時間数が補完されること() {
    let actual = sample_request().validate("Room 1").unwrap();

    assert_eq!(actual.room, "Room 1");
    assert_eq!(actual.duration_hours, 1.0);
}

#[test]
fn test_validate_必須項目が欠けている場合() {
    let mut request = sample_request();
    request.name = "  ".to_string();
    assert_eq!(
        request.validate("Room 1"),
        Err(ValidationError::missing_field("name"))
    );

    let mut request = sample_request();
    request.teacher = "".to_string();
    assert_eq!(
        request.validate("Room 1"),
        Err(ValidationError::missing_field("teacher"))
    );

    let mut request = sample_request();
    request.date = None;
    assert_eq!(
        request.validate("Room 1"),
        Err(ValidationError::missing_field("date"))
    );

    let mut request = sample_request();
    request.time = None;
    assert_eq!(
        request.validate("Room 1"),
        Err(ValidationError::missing_field("time"))
    );
}
