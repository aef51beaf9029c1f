use crate::entity::class_slot::{SlotId, StudentId};
use linked_hash_map::LinkedHashMap;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChargeKind {
    Half,
    Full,
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChargeKind::Half => write!(f, "half"),
            ChargeKind::Full => write!(f, "full"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Charge {
    pub student_id: StudentId,
    pub kind: ChargeKind,
}

// 教師が送信した1回分の請求
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeSubmission {
    pub class_id: SlotId,
    pub class_name: String,
    pub teacher_name: String,
    pub charges: Vec<Charge>,
}

type ChargeKey = (SlotId, StudentId);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChargeLedger {
    pending: LinkedHashMap<ChargeKey, ChargeKind>,
    sent: LinkedHashMap<ChargeKey, ChargeKind>,
    submissions: Vec<ChargeSubmission>,
}

impl ChargeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pending(&mut self, class_id: &str, student_id: &str, kind: ChargeKind) {
        self.pending
            .insert((class_id.to_string(), student_id.to_string()), kind);
    }

    pub fn get_pending(&self, class_id: &str, student_id: &str) -> Option<ChargeKind> {
        self.pending
            .get(&(class_id.to_string(), student_id.to_string()))
            .copied()
    }

    pub fn get_sent(&self, class_id: &str, student_id: &str) -> Option<ChargeKind> {
        self.sent
            .get(&(class_id.to_string(), student_id.to_string()))
            .copied()
    }

    pub fn has_pending(&self, class_id: &str) -> bool {
        self.pending.keys().any(|(c, _)| c == class_id)
    }

    // 対象クラスの保留分を送信済みに移す。保留がなければNone
    pub fn submit(
        &mut self,
        class_id: &str,
        class_name: &str,
        teacher_name: &str,
    ) -> Option<ChargeSubmission> {
        let keys: Vec<ChargeKey> = self
            .pending
            .keys()
            .filter(|(c, _)| c == class_id)
            .cloned()
            .collect();

        if keys.is_empty() {
            return None;
        }

        let mut charges = vec![];
        for key in keys {
            if let Some(kind) = self.pending.remove(&key) {
                charges.push(Charge {
                    student_id: key.1.clone(),
                    kind,
                });
                self.sent.insert(key, kind);
            }
        }

        let submission = ChargeSubmission {
            class_id: class_id.to_string(),
            class_name: class_name.to_string(),
            teacher_name: teacher_name.to_string(),
            charges,
        };
        self.submissions.push(submission.clone());

        Some(submission)
    }

    pub fn remove_student(&mut self, class_id: &str, student_id: &str) {
        let key = (class_id.to_string(), student_id.to_string());
        self.pending.remove(&key);
        self.sent.remove(&key);
    }

    pub fn clear_class(&mut self, class_id: &str) {
        let keys: Vec<ChargeKey> = self
            .pending
            .keys()
            .chain(self.sent.keys())
            .filter(|(c, _)| c == class_id)
            .cloned()
            .collect();

        for key in keys.iter() {
            self.pending.remove(key);
            self.sent.remove(key);
        }
    }

    pub fn get_submissions(&self) -> &[ChargeSubmission] {
        &self.submissions
    }
}

#[test]
fn test_submit_対象クラスの保留分だけ送信されること() {
    let mut ledger = ChargeLedger::new();
    ledger.set_pending("c1", "s1", ChargeKind::Full);
    ledger.set_pending("c1", "s2", ChargeKind::Half);
    ledger.set_pending("c2", "s1", ChargeKind::Half);

    let submission = ledger.submit("c1", "Algebra", "Dana").unwrap();

    assert_eq!(
        submission.charges,
        vec![
            Charge {
                student_id: "s1".to_string(),
                kind: ChargeKind::Full
            },
            Charge {
                student_id: "s2".to_string(),
                kind: ChargeKind::Half
            },
        ]
    );
    assert_eq!(ledger.get_sent("c1", "s2"), Some(ChargeKind::Half));
    assert_eq!(ledger.get_pending("c1", "s1"), None);
    assert!(ledger.has_pending("c2"));
    assert_eq!(ledger.get_submissions().len(), 1);
}

#[test]
fn test_submit_保留がなければNone() {
    let mut ledger = ChargeLedger::new();
    assert_eq!(ledger.submit("c1", "Algebra", "Dana"), None);
    assert!(ledger.get_submissions().is_empty());
}

#[test]
fn test_clear_class_保留と送信済みが消えること() {
    let mut ledger = ChargeLedger::new();
    ledger.set_pending("c1", "s1", ChargeKind::Full);
    ledger.submit("c1", "Algebra", "Dana");
    ledger.set_pending("c1", "s2", ChargeKind::Half);
    ledger.set_pending("c2", "s2", ChargeKind::Half);

    ledger.clear_class("c1");

    assert_eq!(ledger.get_sent("c1", "s1"), None);
    assert_eq!(ledger.get_pending("c1", "s2"), None);
    assert_eq!(ledger.get_pending("c2", "s2"), Some(ChargeKind::Half));
    // 送信履歴は残る
    assert_eq!(ledger.get_submissions().len(), 1);
}
