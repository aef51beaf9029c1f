use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn missing_field(field: &str) -> Self {
        ValidationError(format!("missing required field: {}", field))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

#[test]
fn test_missing_field_フィールド名がメッセージに含まれること() {
    let actual = ValidationError::missing_field("teacher");
    assert_eq!(actual.to_string(), "missing required field: teacher");
}
