use crate::entity::class_slot::{ClassSlot, SlotId, StudentId};
use linked_hash_map::LinkedHashMap;

// クラスID -> 生徒ID -> 出席
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttendanceMap {
    classes: LinkedHashMap<SlotId, LinkedHashMap<StudentId, bool>>,
}

impl AttendanceMap {
    pub fn new() -> Self {
        Self {
            classes: LinkedHashMap::new(),
        }
    }

    // 名簿の全員を欠席として初期化する
    pub fn from_slots(slots: &[ClassSlot]) -> Self {
        let mut attendance = Self::new();
        for slot in slots.iter() {
            attendance.reset_class(slot.get_id(), slot.get_students());
        }
        attendance
    }

    pub fn init_class(&mut self, class_id: &str) {
        self.classes
            .entry(class_id.to_string())
            .or_insert_with(LinkedHashMap::new);
    }

    pub fn seed_student(&mut self, class_id: &str, student_id: &str) {
        self.classes
            .entry(class_id.to_string())
            .or_insert_with(LinkedHashMap::new)
            .insert(student_id.to_string(), false);
    }

    pub fn remove_student(&mut self, class_id: &str, student_id: &str) {
        if let Some(entries) = self.classes.get_mut(class_id) {
            entries.remove(student_id);
        }
    }

    pub fn toggle(&mut self, class_id: &str, student_id: &str) -> bool {
        let entries = self
            .classes
            .entry(class_id.to_string())
            .or_insert_with(LinkedHashMap::new);
        let present = !entries.get(student_id).copied().unwrap_or(false);
        entries.insert(student_id.to_string(), present);

        present
    }

    // 現在の名簿だけで作り直す
    pub fn reset_class(&mut self, class_id: &str, members: &[StudentId]) {
        let entries: LinkedHashMap<StudentId, bool> =
            members.iter().map(|id| (id.clone(), false)).collect();
        self.classes.insert(class_id.to_string(), entries);
    }

    pub fn is_present(&self, class_id: &str, student_id: &str) -> bool {
        self.classes
            .get(class_id)
            .and_then(|entries| entries.get(student_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn has_marked_attendance(&self, class_id: &str) -> bool {
        self.classes
            .get(class_id)
            .map(|entries| entries.values().any(|present| *present))
            .unwrap_or(false)
    }

    pub fn get_class(&self, class_id: &str) -> Option<&LinkedHashMap<StudentId, bool>> {
        self.classes.get(class_id)
    }

    pub fn has_entry(&self, class_id: &str, student_id: &str) -> bool {
        self.classes
            .get(class_id)
            .map(|entries| entries.contains_key(student_id))
            .unwrap_or(false)
    }
}

#[test]
fn test_toggle_出席と欠席が切り替わること() {
    let mut attendance = AttendanceMap::new();
    attendance.seed_student("c1", "s1");

    assert!(!attendance.is_present("c1", "s1"));
    assert!(attendance.toggle("c1", "s1"));
    assert!(attendance.is_present("c1", "s1"));
    assert!(attendance.has_marked_attendance("c1"));
    assert!(!attendance.toggle("c1", "s1"));
    assert!(!attendance.has_marked_attendance("c1"));
}

#[test]
fn test_reset_class_名簿外の生徒は消えること() {
    let mut attendance = AttendanceMap::new();
    attendance.seed_student("c1", "s1");
    attendance.seed_student("c1", "s2");
    attendance.toggle("c1", "s1");

    attendance.reset_class("c1", &["s1".to_string()]);

    assert!(!attendance.is_present("c1", "s1"));
    assert!(attendance.has_entry("c1", "s1"));
    assert!(!attendance.has_entry("c1", "s2"));
}

#[test]
fn test_init_class_既存のエントリは上書きしないこと() {
    let mut attendance = AttendanceMap::new();
    attendance.seed_student("c1", "s1");
    attendance.init_class("c1");
    attendance.init_class("c2");

    assert!(attendance.has_entry("c1", "s1"));
    assert_eq!(attendance.get_class("c2").map(|e| e.len()), Some(0));
}
