use crate::application::config::CalendarConfig;
use crate::application::error::ScheduleError;
use crate::application::interface::FixtureRepositoryTrait;
use crate::entity::attendance::AttendanceMap;
use crate::entity::calendar::{project_week, DayBucket};
use crate::entity::charge::{ChargeKind, ChargeLedger, ChargeSubmission};
use crate::entity::class_slot::{normalize_duration, ClassSlot, SlotId, SlotRequest, StudentId};
use crate::entity::conflict::{
    busy_labels, busy_ranges, find_conflicts, first_free_time, is_blocked, time_options,
    BusyRange, GroupingKey,
};
use crate::entity::error::ValidationError;
use crate::entity::student::{NewStudent, Payment, Student, StudentUpdate};
use crate::entity::time_of_day::TimeOfDay;
use crate::entity::week_window::WeekWindow;
use chrono::NaiveDate;
use log::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct SlotCreated {
    pub slot: ClassSlot,
    // falseの場合、表示中の週は端で止まっていて新しいスロットは見えない
    pub visible_in_window: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeOption {
    pub time: TimeOfDay,
    pub blocked: bool,
}

// クラス追加フォームの入力途中に毎回計算し直す
#[derive(Clone, Debug, PartialEq)]
pub struct Availability {
    pub busy_ranges: Vec<BusyRange>,
    pub busy_labels: Vec<String>,
    pub options: Vec<TimeOption>,
    pub first_free: Option<TimeOfDay>,
    pub selected_is_blocked: bool,
}

// 画面全体で1つだけ持つ。変更はすべてここを通す
pub struct ClassSlotStore {
    config: CalendarConfig,
    today: NaiveDate,
    slots: Vec<ClassSlot>,
    students: Vec<Student>,
    attendance: AttendanceMap,
    charges: ChargeLedger,
    window: WeekWindow,
    selected_slot_id: Option<SlotId>,
}

impl ClassSlotStore {
    pub fn new(
        config: CalendarConfig,
        today: NaiveDate,
        slots: Vec<ClassSlot>,
        students: Vec<Student>,
    ) -> Self {
        let window = WeekWindow::new(today, config.first_day_of_week, config.max_week_offset);
        let attendance = AttendanceMap::from_slots(&slots);
        let selected_slot_id = slots.first().map(|slot| slot.get_id().to_string());

        Self {
            config,
            today,
            slots,
            students,
            attendance,
            charges: ChargeLedger::new(),
            window,
            selected_slot_id,
        }
    }

    pub fn from_repository(repository: &dyn FixtureRepositoryTrait) -> Self {
        Self::new(
            repository.get_config().clone(),
            repository.get_today(),
            repository.get_class_slots().to_vec(),
            repository.get_students().to_vec(),
        )
    }

    pub fn get_config(&self) -> &CalendarConfig {
        &self.config
    }

    pub fn get_today(&self) -> NaiveDate {
        self.today
    }

    pub fn get_slots(&self) -> &[ClassSlot] {
        &self.slots
    }

    pub fn get_students(&self) -> &[Student] {
        &self.students
    }

    pub fn get_attendance(&self) -> &AttendanceMap {
        &self.attendance
    }

    pub fn get_charges(&self) -> &ChargeLedger {
        &self.charges
    }

    pub fn get_window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn get_slot(&self, class_id: &str) -> Option<&ClassSlot> {
        self.slots.iter().find(|slot| slot.get_id() == class_id)
    }

    pub fn get_student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == student_id)
    }

    // 選択中のIDが見つからなければ先頭のスロット
    pub fn selected_slot(&self) -> Option<&ClassSlot> {
        self.selected_slot_id
            .as_deref()
            .and_then(|id| self.get_slot(id))
            .or_else(|| self.slots.first())
    }

    pub fn open_slot(&mut self, class_id: &str) -> bool {
        if self.get_slot(class_id).is_none() {
            debug!("open_slot: unknown class {}", class_id);
            return false;
        }

        self.selected_slot_id = Some(class_id.to_string());
        true
    }

    // ---- 週の表示 ----

    pub fn set_week_offset(&mut self, offset: i64) -> i64 {
        self.window.set_offset(offset)
    }

    pub fn next_week(&mut self) -> i64 {
        self.window.next_week()
    }

    pub fn previous_week(&mut self) -> i64 {
        self.window.previous_week()
    }

    pub fn week_buckets(&self) -> Vec<DayBucket<'_>> {
        project_week(&self.slots, &self.window, &self.config.day_names)
    }

    // ---- スロット作成 ----

    fn request_key<'a>(&'a self, request: &'a SlotRequest) -> &'a str {
        match self.config.grouping_key {
            GroupingKey::Subject => request.name.trim(),
            GroupingKey::Teacher => request.teacher.trim(),
            GroupingKey::Room => match request.room.trim() {
                "" => self.config.default_room.as_str(),
                room => room,
            },
        }
    }

    pub fn busy_ranges_for(&self, key: &str, date: NaiveDate) -> Vec<BusyRange> {
        busy_ranges(&self.slots, self.config.grouping_key, key, date)
    }

    pub fn availability(&self, request: &SlotRequest) -> Availability {
        let ranges = match request.date {
            Some(date) => self.busy_ranges_for(self.request_key(request), date),
            None => vec![],
        };
        let duration_hours = normalize_duration(request.duration_hours);

        let all_options = time_options(&self.slots);
        let options = all_options
            .iter()
            .map(|time| TimeOption {
                time: *time,
                blocked: is_blocked(*time, duration_hours, &ranges),
            })
            .collect();
        let selected_is_blocked = request
            .time
            .map(|time| is_blocked(time, duration_hours, &ranges))
            .unwrap_or(false);

        Availability {
            busy_labels: busy_labels(&ranges),
            first_free: first_free_time(&all_options, duration_hours, &ranges),
            busy_ranges: ranges,
            options,
            selected_is_blocked,
        }
    }

    pub fn create_slot(&mut self, request: &SlotRequest) -> Result<SlotCreated, ScheduleError> {
        let candidate = request.validate(&self.config.default_room)?;

        let conflicts = find_conflicts(&candidate, &self.slots, self.config.grouping_key);
        if !conflicts.is_empty() {
            info!(
                "rejected {} on {} at {}: overlaps {} slot(s)",
                candidate.name,
                candidate.date,
                candidate.time,
                conflicts.len()
            );
            return Err(ScheduleError::Conflict { ranges: conflicts });
        }

        let day = self.config.day_names.name_of(candidate.date);
        let slot = ClassSlot::new(Uuid::new_v4().to_string(), &candidate, day);

        self.slots.push(slot.clone());
        self.attendance.init_class(slot.get_id());
        self.selected_slot_id = Some(slot.get_id().to_string());

        let visible_in_window = self.window.reveal(slot.get_date());
        if visible_in_window {
            info!(
                "created {} ({}) on {} at {}",
                slot.get_name(),
                slot.get_id(),
                slot.get_date(),
                slot.get_time()
            );
        } else {
            warn!(
                "created {} on {} outside the reachable weeks; showing week offset {}",
                slot.get_id(),
                slot.get_date(),
                self.window.get_offset()
            );
        }

        Ok(SlotCreated {
            slot,
            visible_in_window,
        })
    }

    // ---- 名簿と出席 ----

    pub fn add_student(&mut self, class_id: &str, student_id: &str) -> bool {
        if self.get_student(student_id).is_none() {
            debug!("add_student: unknown student {}", student_id);
            return false;
        }

        let slot = match self.slots.iter_mut().find(|slot| slot.get_id() == class_id) {
            Some(slot) => slot,
            None => {
                debug!("add_student: unknown class {}", class_id);
                return false;
            }
        };

        if !slot.add_student(student_id.to_string()) {
            return false;
        }

        self.attendance.seed_student(class_id, student_id);
        true
    }

    pub fn remove_student(&mut self, class_id: &str, student_id: &str) -> bool {
        let slot = match self.slots.iter_mut().find(|slot| slot.get_id() == class_id) {
            Some(slot) => slot,
            None => {
                debug!("remove_student: unknown class {}", class_id);
                return false;
            }
        };

        let removed = slot.remove_student(student_id);
        self.attendance.remove_student(class_id, student_id);
        self.charges.remove_student(class_id, student_id);

        removed
    }

    // 名簿はそのままで全員欠席に戻す。請求の下書きも消す
    pub fn clear_attendance(&mut self, class_id: &str) -> bool {
        let members: Vec<StudentId> = match self.get_slot(class_id) {
            Some(slot) => slot.get_students().to_vec(),
            None => {
                debug!("clear_attendance: unknown class {}", class_id);
                return false;
            }
        };

        self.attendance.reset_class(class_id, &members);
        self.charges.clear_class(class_id);
        true
    }

    pub fn toggle_attendance(&mut self, class_id: &str, student_id: &str) -> Option<bool> {
        if !self.is_member(class_id, student_id) {
            debug!("toggle_attendance: {} is not in {}", student_id, class_id);
            return None;
        }

        Some(self.attendance.toggle(class_id, student_id))
    }

    fn is_member(&self, class_id: &str, student_id: &str) -> bool {
        self.get_slot(class_id)
            .map(|slot| slot.has_student(student_id))
            .unwrap_or(false)
    }

    pub fn available_students(&self, class_id: &str) -> Vec<&Student> {
        match self.get_slot(class_id) {
            Some(slot) => self
                .students
                .iter()
                .filter(|student| !slot.has_student(&student.id))
                .collect(),
            None => vec![],
        }
    }

    pub fn classes_for_teacher(&self, teacher: &str) -> Vec<&ClassSlot> {
        self.slots
            .iter()
            .filter(|slot| slot.get_teacher() == teacher)
            .collect()
    }

    // ---- 教師からの請求 ----

    pub fn set_pending_charge(&mut self, class_id: &str, student_id: &str, kind: ChargeKind) -> bool {
        if !self.is_member(class_id, student_id) {
            debug!("set_pending_charge: {} is not in {}", student_id, class_id);
            return false;
        }

        debug!("pending {} charge for {} in {}", kind, student_id, class_id);
        self.charges.set_pending(class_id, student_id, kind);
        true
    }

    pub fn send_charges(&mut self, class_id: &str, teacher_name: &str) -> Option<ChargeSubmission> {
        let class_name = self.get_slot(class_id)?.get_name().to_string();

        let submission = self.charges.submit(class_id, &class_name, teacher_name)?;
        info!(
            "{} charge(s) sent for {} by {}",
            submission.charges.len(),
            class_id,
            teacher_name
        );

        Some(submission)
    }

    // ---- 会計と生徒 ----

    // 同じ生徒への2件目以降は無視する
    pub fn apply_payments(&mut self, payments: &[Payment]) -> usize {
        let mut seen: Vec<&str> = vec![];
        let mut applied = 0;

        for payment in payments.iter() {
            if seen.contains(&payment.student_id.as_str()) {
                continue;
            }
            seen.push(&payment.student_id);

            let student = match self.students.iter_mut().find(|s| s.id == payment.student_id) {
                Some(student) => student,
                None => {
                    debug!("apply_payments: unknown student {}", payment.student_id);
                    continue;
                }
            };

            if !payment.is_applicable(student.balance) {
                debug!("apply_payments: skipped {:?}", payment);
                continue;
            }

            student.apply_payment(payment.method, payment.kind);
            applied += 1;
        }

        applied
    }

    pub fn search_students(&self, query: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|student| student.matches_query(query))
            .collect()
    }

    pub fn owing_students(&self, query: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|student| student.has_open_balance() && student.matches_query(query))
            .collect()
    }

    pub fn add_new_student(&mut self, new_student: NewStudent) -> Result<StudentId, ValidationError> {
        let student = new_student.into_student(Uuid::new_v4().to_string())?;
        let id = student.id.clone();

        info!("added student {} ({})", student.full_name, id);
        self.students.push(student);

        Ok(id)
    }

    pub fn update_student(&mut self, student_id: &str, update: &StudentUpdate) -> bool {
        match self.students.iter_mut().find(|s| s.id == student_id) {
            Some(student) => {
                student.apply_update(update);
                true
            }
            None => {
                debug!("update_student: unknown student {}", student_id);
                false
            }
        }
    }
}

#[cfg(test)]
use crate::entity::charge::Charge;

#[cfg(test)]
use crate::entity::conflict::Candidate;

#[cfg(test)]
use crate::entity::student::{PaymentKind, PaymentMethod};

#[cfg(test)]
fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2024/01/10(水)を今日とし、月曜10:00と水曜18:00にクラスがある
#[cfg(test)]
fn sample_store() -> ClassSlotStore {
    let config = CalendarConfig::default();
    let algebra = Candidate {
        name: "Algebra".to_string(),
        teacher: "Dana".to_string(),
        room: "Room 3".to_string(),
        date: ymd(2024, 1, 8),
        time: TimeOfDay::parse("10:00").unwrap(),
        duration_hours: 1.0,
    };
    let evening = Candidate {
        name: "Evening".to_string(),
        teacher: "Noa".to_string(),
        room: "Room 5".to_string(),
        date: ymd(2024, 1, 10),
        time: TimeOfDay::parse("18:00").unwrap(),
        duration_hours: 1.5,
    };
    let slots = vec![
        ClassSlot::new(
            "c1".to_string(),
            &algebra,
            config.day_names.name_of(algebra.date),
        )
        .with_students(vec!["s1".to_string(), "s2".to_string()]),
        ClassSlot::new(
            "c2".to_string(),
            &evening,
            config.day_names.name_of(evening.date),
        )
        .with_students(vec!["s1".to_string()]),
    ];
    let students = vec![
        Student {
            balance: 350.0,
            ..Student::new("s1".to_string(), "Ori Levi".to_string(), "050-1112233".to_string())
        },
        Student::new("s2".to_string(), "Noa Dan".to_string(), "050-2223344".to_string()),
        Student {
            balance: 120.0,
            email: Some("maya@example.com".to_string()),
            ..Student::new("s3".to_string(), "Maya Shalev".to_string(), "050-3334455".to_string())
        },
    ];

    ClassSlotStore::new(config, ymd(2024, 1, 10), slots, students)
}

#[cfg(test)]
fn algebra_request(date: NaiveDate, time: &str, duration_hours: f64) -> SlotRequest {
    SlotRequest {
        name: "Algebra".to_string(),
        teacher: "Dana".to_string(),
        room: "Room 3".to_string(),
        date: Some(date),
        time: TimeOfDay::parse(time).ok(),
        duration_hours: Some(duration_hours),
    }
}

#[test]
fn test_new_名簿の全員が欠席で初期化されること() {
    let store = sample_store();

    assert!(store.get_attendance().has_entry("c1", "s1"));
    assert!(store.get_attendance().has_entry("c1", "s2"));
    assert!(!store.get_attendance().is_present("c1", "s1"));
    assert_eq!(store.selected_slot().map(|s| s.get_id()), Some("c1"));
}

#[test]
fn test_create_slot_重ならない場合は追加されて選択されること() {
    let mut store = sample_store();

    let created = store
        .create_slot(&algebra_request(ymd(2024, 1, 8), "11:00", 1.0))
        .unwrap();

    assert!(created.visible_in_window);
    assert_eq!(created.slot.get_day(), "שני");
    assert_eq!(store.get_slots().len(), 3);
    assert_eq!(
        store.selected_slot().map(|s| s.get_id()),
        Some(created.slot.get_id())
    );
    assert_eq!(
        store
            .get_attendance()
            .get_class(created.slot.get_id())
            .map(|e| e.len()),
        Some(0)
    );
}

#[test]
fn test_create_slot_重なる場合は何も変更しないこと() {
    let mut store = sample_store();
    store.next_week();
    let slots_before = store.get_slots().to_vec();
    let attendance_before = store.get_attendance().clone();
    let window_before = *store.get_window();

    let actual = store.create_slot(&algebra_request(ymd(2024, 1, 8), "10:30", 1.0));

    match actual {
        Err(ScheduleError::Conflict { ranges }) => {
            assert_eq!(ranges.len(), 1);
            assert_eq!(ranges[0].slot_id, "c1");
            assert_eq!(ranges[0].label, "10:00 - 11:00");
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(store.get_slots(), slots_before.as_slice());
    assert_eq!(store.get_attendance(), &attendance_before);
    assert_eq!(store.get_window(), &window_before);
    assert_eq!(store.selected_slot().map(|s| s.get_id()), Some("c1"));
}

#[test]
fn test_create_slot_必須項目が欠けている場合() {
    let mut store = sample_store();
    let mut request = algebra_request(ymd(2024, 1, 8), "12:00", 1.0);
    request.teacher = "".to_string();

    let actual = store.create_slot(&request);

    assert_eq!(
        actual,
        Err(ScheduleError::Validation(ValidationError::missing_field(
            "teacher"
        )))
    );
    assert_eq!(store.get_slots().len(), 2);
}

#[test]
fn test_create_slot_時間数が0以下なら1時間になること() {
    let mut store = sample_store();

    let created = store
        .create_slot(&algebra_request(ymd(2024, 1, 8), "11:00", 0.0))
        .unwrap();
    assert_eq!(created.slot.get_duration_hours(), 1.0);

    // 11:00-12:00が埋まったので11:30は重なる
    let actual = store.create_slot(&algebra_request(ymd(2024, 1, 8), "11:30", 1.0));
    assert!(matches!(actual, Err(ScheduleError::Conflict { .. })));
}

#[test]
fn test_create_slot_先の週の日付なら表示週が移動すること() {
    let mut store = sample_store();

    let created = store
        .create_slot(&algebra_request(ymd(2024, 1, 24), "10:00", 1.0))
        .unwrap();

    assert!(created.visible_in_window);
    assert_eq!(store.get_window().get_offset(), 2);
    assert!(store
        .week_buckets()
        .iter()
        .any(|b| b.slots.iter().any(|s| s.get_id() == created.slot.get_id())));
}

#[test]
fn test_create_slot_範囲外の日付でも作成されるが表示週は端で止まること() {
    let mut store = sample_store();

    let created = store
        .create_slot(&algebra_request(ymd(2024, 6, 5), "10:00", 1.0))
        .unwrap();

    assert!(!created.visible_in_window);
    assert_eq!(store.get_window().get_offset(), 4);
    assert_eq!(store.get_slots().len(), 3);
}

#[test]
fn test_create_slot_部屋でまとめる設定の場合() {
    let mut store = sample_store();
    store.config.grouping_key = GroupingKey::Room;

    let mut request = algebra_request(ymd(2024, 1, 8), "10:30", 1.0);
    request.name = "Geometry".to_string();

    assert!(matches!(
        store.create_slot(&request),
        Err(ScheduleError::Conflict { .. })
    ));

    request.room = "Room 9".to_string();
    assert!(store.create_slot(&request).is_ok());
}

#[test]
fn test_availability_ふさがった時間と最初の空きが返ること() {
    let store = sample_store();
    let request = algebra_request(ymd(2024, 1, 8), "09:30", 1.0);

    let actual = store.availability(&request);

    assert_eq!(actual.busy_labels, vec!["10:00 - 11:00".to_string()]);
    assert!(actual.selected_is_blocked);
    assert_eq!(actual.first_free, TimeOfDay::parse("08:00").ok());

    let blocked: Vec<String> = actual
        .options
        .iter()
        .filter(|o| o.blocked)
        .map(|o| o.time.to_string())
        .collect();
    assert_eq!(blocked, vec!["09:30", "10:00", "10:30"]);
}

#[test]
fn test_availability_日付が変わると計算し直されること() {
    let store = sample_store();
    let request = algebra_request(ymd(2024, 1, 9), "10:00", 1.0);

    let actual = store.availability(&request);

    assert!(actual.busy_ranges.is_empty());
    assert!(!actual.selected_is_blocked);
    assert!(actual.options.iter().all(|o| !o.blocked));
}

#[test]
fn test_add_student_2回追加しても1人だけになること() {
    let mut store = sample_store();

    assert!(store.add_student("c2", "s3"));
    assert!(!store.add_student("c2", "s3"));

    let roster = store.get_slot("c2").unwrap().get_students();
    assert_eq!(roster.iter().filter(|s| *s == "s3").count(), 1);
    assert!(store.get_attendance().has_entry("c2", "s3"));
    assert!(!store.get_attendance().is_present("c2", "s3"));
}

#[test]
fn test_add_student_存在しないIDの場合は何もしないこと() {
    let mut store = sample_store();

    assert!(!store.add_student("c9", "s3"));
    assert!(!store.add_student("c2", "s9"));
    assert_eq!(store.get_slot("c2").unwrap().get_students().len(), 1);
    assert!(!store.get_attendance().has_entry("c2", "s9"));
}

#[test]
fn test_remove_student_後にclear_attendanceしてもエントリが残らないこと() {
    let mut store = sample_store();
    store.toggle_attendance("c1", "s2");

    assert!(store.remove_student("c1", "s2"));
    assert!(store.clear_attendance("c1"));

    assert!(!store.get_attendance().has_entry("c1", "s2"));
    assert!(store.get_attendance().has_entry("c1", "s1"));
    assert!(!store.get_slot("c1").unwrap().has_student("s2"));
}

#[test]
fn test_clear_attendance_全員欠席に戻り名簿は変わらないこと() {
    let mut store = sample_store();
    store.toggle_attendance("c1", "s1");
    store.toggle_attendance("c1", "s2");
    store.set_pending_charge("c1", "s1", ChargeKind::Full);

    assert!(store.clear_attendance("c1"));

    assert!(!store.get_attendance().has_marked_attendance("c1"));
    assert_eq!(store.get_slot("c1").unwrap().get_students().len(), 2);
    assert!(!store.get_charges().has_pending("c1"));
    assert!(!store.clear_attendance("c9"));
}

#[test]
fn test_toggle_attendance_名簿外の生徒は何もしないこと() {
    let mut store = sample_store();

    assert_eq!(store.toggle_attendance("c1", "s1"), Some(true));
    assert_eq!(store.toggle_attendance("c1", "s3"), None);
    assert_eq!(store.toggle_attendance("c9", "s1"), None);
    assert!(!store.get_attendance().has_entry("c1", "s3"));
}

#[test]
fn test_available_students_名簿に居ない生徒だけ返ること() {
    let store = sample_store();

    let ids: Vec<&str> = store
        .available_students("c1")
        .iter()
        .map(|s| s.id.as_str())
        .collect();

    assert_eq!(ids, vec!["s3"]);
    assert!(store.available_students("c9").is_empty());
}

#[test]
fn test_classes_for_teacher_正常系() {
    let store = sample_store();

    let ids: Vec<&str> = store
        .classes_for_teacher("Noa")
        .iter()
        .map(|s| s.get_id())
        .collect();

    assert_eq!(ids, vec!["c2"]);
}

#[test]
fn test_send_charges_送信内容にクラス名と教師名が入ること() {
    let mut store = sample_store();

    assert!(store.set_pending_charge("c1", "s1", ChargeKind::Half));
    assert!(!store.set_pending_charge("c1", "s3", ChargeKind::Full));

    let submission = store.send_charges("c1", "Dana").unwrap();

    assert_eq!(submission.class_name, "Algebra");
    assert_eq!(submission.teacher_name, "Dana");
    assert_eq!(
        submission.charges,
        vec![Charge {
            student_id: "s1".to_string(),
            kind: ChargeKind::Half
        }]
    );
    assert_eq!(store.send_charges("c1", "Dana"), None);
}

#[test]
fn test_apply_payments_正常系と不正な一部支払い() {
    let mut store = sample_store();
    let payments = vec![
        Payment {
            student_id: "s1".to_string(),
            method: PaymentMethod::Credit,
            kind: PaymentKind::Partial(100.0),
        },
        Payment {
            student_id: "s1".to_string(),
            method: PaymentMethod::Cash,
            kind: PaymentKind::Full,
        },
        Payment {
            student_id: "s3".to_string(),
            method: PaymentMethod::Cash,
            kind: PaymentKind::Partial(500.0),
        },
        Payment {
            student_id: "s9".to_string(),
            method: PaymentMethod::Cash,
            kind: PaymentKind::Full,
        },
    ];

    let applied = store.apply_payments(&payments);

    assert_eq!(applied, 1);
    let ori = store.get_student("s1").unwrap();
    assert_eq!(ori.balance, 250.0);
    assert_eq!(ori.last_payment_method, Some(PaymentMethod::Credit));
    assert_eq!(store.get_student("s3").unwrap().balance, 120.0);
}

#[test]
fn test_owing_students_残高があり検索語に合う生徒() {
    let store = sample_store();

    let ids: Vec<&str> = store.owing_students("").iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s3"]);

    let ids: Vec<&str> = store
        .owing_students("EXAMPLE")
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["s3"]);
}

#[test]
fn test_add_new_student_検索できること() {
    let mut store = sample_store();

    let id = store
        .add_new_student(NewStudent {
            first_name: "Tamar".to_string(),
            last_name: "Ochana".to_string(),
            phone: "050-8887766".to_string(),
            ..Default::default()
        })
        .unwrap();

    let found: Vec<&str> = store
        .search_students("ochana")
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(found, vec![id.as_str()]);
    assert!(store.available_students("c1").iter().any(|s| s.id == id));
}

#[test]
fn test_update_student_存在しないIDは何もしないこと() {
    let mut store = sample_store();
    let update = StudentUpdate {
        full_name: Some("Ori L.".to_string()),
        ..Default::default()
    };

    assert!(store.update_student("s1", &update));
    assert_eq!(store.get_student("s1").unwrap().full_name, "Ori L.");
    assert!(!store.update_student("s9", &update));
}

#[test]
fn test_week_buckets_週を移動すると別の週のスロットになること() {
    let mut store = sample_store();

    let total = |store: &ClassSlotStore| {
        store
            .week_buckets()
            .iter()
            .map(|b| b.slots.len())
            .sum::<usize>()
    };

    assert_eq!(total(&store), 2);
    assert_eq!(store.next_week(), 1);
    assert_eq!(total(&store), 0);
    assert_eq!(store.set_week_offset(-10), 0);
    assert_eq!(total(&store), 2);
}

#[test]
fn test_open_slot_存在しないIDは選択されないこと() {
    let mut store = sample_store();

    assert!(store.open_slot("c2"));
    assert_eq!(store.selected_slot().map(|s| s.get_id()), Some("c2"));
    assert!(!store.open_slot("c9"));
    assert_eq!(store.selected_slot().map(|s| s.get_id()), Some("c2"));
}
