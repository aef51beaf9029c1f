use crate::entity::class_slot::StudentId;
use crate::entity::error::ValidationError;
use std::fmt;

pub const FALLBACK_STUDENT_NAME: &str = "Student";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Bank,
    Credit,
    Check,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Bank => write!(f, "bank"),
            PaymentMethod::Credit => write!(f, "credit"),
            PaymentMethod::Check => write!(f, "check"),
        }
    }
}

pub fn read_payment_method(s: &str) -> Option<PaymentMethod> {
    match s.trim().to_lowercase().as_str() {
        "cash" => Some(PaymentMethod::Cash),
        "bank" => Some(PaymentMethod::Bank),
        "credit" => Some(PaymentMethod::Credit),
        "check" => Some(PaymentMethod::Check),
        _ => None,
    }
}

#[test]
fn test_read_payment_method_正常系() {
    assert_eq!(read_payment_method("cash"), Some(PaymentMethod::Cash));
    assert_eq!(read_payment_method("Credit"), Some(PaymentMethod::Credit));
    assert_eq!(read_payment_method("paypal"), None);
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PaymentKind {
    Full,
    Partial(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    pub student_id: StudentId,
    pub method: PaymentMethod,
    pub kind: PaymentKind,
}

impl Payment {
    // 一部支払いは1以上かつ残高以下のみ受け付ける
    pub fn is_applicable(&self, balance: f64) -> bool {
        match self.kind {
            PaymentKind::Full => true,
            PaymentKind::Partial(amount) => amount >= 1.0 && amount <= balance,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub hours: f64,
    pub balance: f64,
    pub last_payment_method: Option<PaymentMethod>,
}

impl Student {
    pub fn new(id: StudentId, full_name: String, phone: String) -> Self {
        Self {
            id,
            full_name,
            phone,
            ..Default::default()
        }
    }

    pub fn has_open_balance(&self) -> bool {
        self.balance > 0.0
    }

    // 空の検索語は全員にマッチする
    pub fn matches_query(&self, query: &str) -> bool {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        let contains = |s: &str| s.to_lowercase().contains(&term);
        let contains_opt = |s: &Option<String>| s.as_deref().map(|v| contains(v)).unwrap_or(false);

        contains(&self.full_name)
            || contains(&self.phone)
            || contains_opt(&self.email)
            || contains_opt(&self.parent_name)
            || contains_opt(&self.parent_phone)
    }

    pub fn apply_payment(&mut self, method: PaymentMethod, kind: PaymentKind) {
        let amount = match kind {
            PaymentKind::Full => self.balance,
            PaymentKind::Partial(amount) if amount > 0.0 && amount.is_finite() => amount,
            // 0以下の一部支払いは何もしない
            PaymentKind::Partial(_) => return,
        };

        self.balance = (self.balance - amount).max(0.0);
        self.last_payment_method = Some(method);
    }

    pub fn apply_update(&mut self, update: &StudentUpdate) {
        if let Some(v) = &update.first_name {
            self.first_name = Some(v.clone());
        }
        if let Some(v) = &update.last_name {
            self.last_name = Some(v.clone());
        }
        if let Some(v) = &update.full_name {
            self.full_name = v.clone();
        }
        if let Some(v) = &update.phone {
            self.phone = v.clone();
        }
        if let Some(v) = &update.email {
            self.email = Some(v.clone());
        }
        if let Some(v) = &update.parent_name {
            self.parent_name = Some(v.clone());
        }
        if let Some(v) = &update.parent_phone {
            self.parent_phone = Some(v.clone());
        }
        if let Some(v) = update.hours {
            self.hours = v;
        }
    }
}

#[cfg(test)]
fn sample_student() -> Student {
    Student {
        email: Some("Ori@example.com".to_string()),
        parent_name: Some("Levi".to_string()),
        balance: 350.0,
        ..Student::new(
            "s1".to_string(),
            "Ori Levi".to_string(),
            "050-1112233".to_string(),
        )
    }
}

#[test]
fn test_matches_query_大文字小文字を区別しないこと() {
    let student = sample_student();

    assert!(student.matches_query("ori"));
    assert!(student.matches_query("  EXAMPLE "));
    assert!(student.matches_query("111"));
    assert!(student.matches_query(""));
    assert!(!student.matches_query("maya"));
}

#[test]
fn test_apply_payment_全額支払い() {
    let mut student = sample_student();
    student.apply_payment(PaymentMethod::Cash, PaymentKind::Full);

    assert_eq!(student.balance, 0.0);
    assert_eq!(student.last_payment_method, Some(PaymentMethod::Cash));
}

#[test]
fn test_apply_payment_一部支払い() {
    let mut student = sample_student();
    student.apply_payment(PaymentMethod::Bank, PaymentKind::Partial(100.0));

    assert_eq!(student.balance, 250.0);
    assert_eq!(student.last_payment_method, Some(PaymentMethod::Bank));
}

#[test]
fn test_apply_payment_残高は0未満にならないこと() {
    let mut student = sample_student();
    student.apply_payment(PaymentMethod::Check, PaymentKind::Partial(1000.0));

    assert_eq!(student.balance, 0.0);
}

#[test]
fn test_apply_payment_0以下の一部支払いは残高を変えないこと() {
    let mut student = sample_student();
    student.apply_payment(PaymentMethod::Cash, PaymentKind::Partial(0.0));
    student.apply_payment(PaymentMethod::Cash, PaymentKind::Partial(-50.0));
    student.apply_payment(PaymentMethod::Cash, PaymentKind::Partial(f64::NAN));

    assert_eq!(student.balance, 350.0);
    assert_eq!(student.last_payment_method, None);
}

#[test]
fn test_is_applicable_一部支払いの範囲() {
    let payment = |amount| Payment {
        student_id: "s1".to_string(),
        method: PaymentMethod::Cash,
        kind: PaymentKind::Partial(amount),
    };

    assert!(payment(1.0).is_applicable(350.0));
    assert!(payment(350.0).is_applicable(350.0));
    assert!(!payment(0.5).is_applicable(350.0));
    assert!(!payment(351.0).is_applicable(350.0));
}

// 生徒一覧画面の新規登録フォーム
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
}

impl NewStudent {
    pub fn into_student(self, id: StudentId) -> Result<Student, ValidationError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let phone = self.phone.trim().to_string();

        if first_name.is_empty() {
            return Err(ValidationError::missing_field("first_name"));
        }
        if last_name.is_empty() {
            return Err(ValidationError::missing_field("last_name"));
        }
        if phone.is_empty() {
            return Err(ValidationError::missing_field("phone"));
        }

        let full_name = compose_full_name(&first_name, &last_name);

        Ok(Student {
            id,
            first_name: Some(first_name),
            last_name: Some(last_name),
            full_name,
            phone,
            email: non_blank(self.email),
            parent_name: non_blank(self.parent_name),
            parent_phone: non_blank(self.parent_phone),
            hours: 0.0,
            balance: 0.0,
            last_payment_method: None,
        })
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn compose_full_name(first_name: &str, last_name: &str) -> String {
    let parts: Vec<&str> = [first_name.trim(), last_name.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        return FALLBACK_STUDENT_NAME.to_string();
    }

    parts.join(" ")
}

#[test]
fn test_compose_full_name_正常系() {
    assert_eq!(compose_full_name("Maya", "Shalev"), "Maya Shalev");
    assert_eq!(compose_full_name(" Maya ", ""), "Maya");
    assert_eq!(compose_full_name("", ""), "Student");
}

#[test]
fn test_into_student_必須項目() {
    let new_student = NewStudent {
        first_name: "Maya".to_string(),
        last_name: "".to_string(),
        phone: "050".to_string(),
        ..Default::default()
    };

    assert_eq!(
        new_student.into_student("s9".to_string()),
        Err(ValidationError::missing_field("last_name"))
    );
}

#[test]
fn test_into_student_残高と時間は0で始まること() {
    let new_student = NewStudent {
        first_name: "Maya".to_string(),
        last_name: "Shalev".to_string(),
        phone: " 050-3334455 ".to_string(),
        email: Some(" ".to_string()),
        ..Default::default()
    };

    let actual = new_student.into_student("s9".to_string()).unwrap();

    assert_eq!(actual.full_name, "Maya Shalev");
    assert_eq!(actual.phone, "050-3334455");
    assert_eq!(actual.email, None);
    assert_eq!(actual.balance, 0.0);
    assert_eq!(actual.hours, 0.0);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub hours: Option<f64>,
}

#[test]
fn test_apply_update_指定した項目だけ変わること() {
    let mut student = sample_student();
    let update = StudentUpdate {
        phone: Some("052-0000000".to_string()),
        hours: Some(12.0),
        ..Default::default()
    };

    student.apply_update(&update);

    assert_eq!(student.phone, "052-0000000");
    assert_eq!(student.hours, 12.0);
    assert_eq!(student.full_name, "Ori Levi");
    assert_eq!(student.balance, 350.0);
}
