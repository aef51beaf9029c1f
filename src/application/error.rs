use crate::entity::conflict::BusyRange;
use crate::entity::error::ValidationError;
use std::fmt;
use std::io;

#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleError {
    Validation(ValidationError),
    // 重なった既存スロットの区間を全て持つ
    Conflict { ranges: Vec<BusyRange> },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScheduleError::Validation(err) => write!(f, "cannot submit: {}", err),
            ScheduleError::Conflict { ranges } => {
                let labels: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
                write!(f, "time slot is taken: {}", labels.join(", "))
            }
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::Validation(err) => Some(err),
            ScheduleError::Conflict { .. } => None,
        }
    }
}

impl From<ValidationError> for ScheduleError {
    fn from(err: ValidationError) -> Self {
        ScheduleError::Validation(err)
    }
}

#[derive(Debug)]
pub enum FixtureError {
    Io { path: String, source: io::Error },
    Yaml { path: String, message: String },
    MissingField { record: String, field: String },
    InvalidValue { record: String, message: String },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FixtureError::Io { path, source } => write!(f, "{}: {}", path, source),
            FixtureError::Yaml { path, message } => write!(f, "{}: invalid yaml: {}", path, message),
            FixtureError::MissingField { record, field } => {
                write!(f, "{}: missing field {:?}", record, field)
            }
            FixtureError::InvalidValue { record, message } => write!(f, "{}: {}", record, message),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[test]
fn test_schedule_error_display_重なった区間が表示されること() {
    let err = ScheduleError::Conflict {
        ranges: vec![BusyRange {
            slot_id: "c1".to_string(),
            start_minutes: 600.0,
            end_minutes: 660.0,
            label: "10:00 - 11:00".to_string(),
        }],
    };

    assert_eq!(err.to_string(), "time slot is taken: 10:00 - 11:00 (c1)");
}

#[test]
fn test_schedule_error_from_validation_error() {
    let err: ScheduleError = ValidationError::missing_field("name").into();
    assert_eq!(err.to_string(), "cannot submit: missing required field: name");
}
