use crate::entity::conflict::GroupingKey;
use crate::entity::day_names::DayNames;
use crate::entity::week_window::DEFAULT_MAX_WEEK_OFFSET;
use chrono::Weekday;

pub const DEFAULT_ROOM: &str = "חדר 1";

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarConfig {
    pub max_week_offset: i64,
    pub first_day_of_week: Weekday,
    pub day_names: DayNames,
    pub grouping_key: GroupingKey,
    pub default_room: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_week_offset: DEFAULT_MAX_WEEK_OFFSET,
            first_day_of_week: Weekday::Sun,
            day_names: DayNames::hebrew(),
            grouping_key: GroupingKey::Subject,
            default_room: DEFAULT_ROOM.to_string(),
        }
    }
}

pub fn read_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}

#[test]
fn test_default_今週から4週先まで() {
    let config = CalendarConfig::default();

    assert_eq!(config.max_week_offset, 4);
    assert_eq!(config.first_day_of_week, Weekday::Sun);
    assert_eq!(config.grouping_key, GroupingKey::Subject);
}

#[test]
fn test_read_weekday_正常系() {
    assert_eq!(read_weekday("Mon"), Some(Weekday::Mon));
    assert_eq!(read_weekday("sunday"), Some(Weekday::Sun));
    assert_eq!(read_weekday("someday"), None);
}
