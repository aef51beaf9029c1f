use crate::application::class_slot_store::ClassSlotStore;
use crate::entity::calendar::DayBucket;
use crate::entity::datetime::format_display_date;
use unicode_width::UnicodeWidthStr;

pub const EMPTY_DAY_LABEL: &str = "יום פנוי";
pub const NO_CLASSES_LABEL: &str = "-";

// 全角文字を含んでも列が揃うように表示幅で埋める
pub fn pad_to_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current >= width {
        return s.to_string();
    }

    format!("{}{}", s, " ".repeat(width - current))
}

#[test]
fn test_pad_to_width_表示幅で埋めること() {
    assert_eq!(pad_to_width("ab", 4), "ab  ");
    assert_eq!(pad_to_width("あ", 4), "あ  ");
    assert_eq!(pad_to_width("abcdef", 4), "abcdef");
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

pub fn render_buckets(buckets: &[DayBucket]) -> Vec<String> {
    let name_width = column_width(buckets.iter().flat_map(|b| b.slots.iter().map(|s| s.get_name())));
    let teacher_width =
        column_width(buckets.iter().flat_map(|b| b.slots.iter().map(|s| s.get_teacher())));
    let room_width = column_width(buckets.iter().flat_map(|b| b.slots.iter().map(|s| s.get_room())));

    let mut lines = vec![];

    for bucket in buckets.iter() {
        let date_label = match bucket.date {
            Some(date) => format_display_date(date),
            None => EMPTY_DAY_LABEL.to_string(),
        };
        lines.push(format!("{} ({})", bucket.day, date_label));

        if bucket.slots.is_empty() {
            lines.push(format!("  {}", NO_CLASSES_LABEL));
            continue;
        }

        for slot in bucket.slots.iter() {
            lines.push(format!(
                "  {}  {}  {}  {}  {}",
                slot.get_time(),
                pad_to_width(slot.get_name(), name_width),
                pad_to_width(slot.get_teacher(), teacher_width),
                pad_to_width(slot.get_room(), room_width),
                slot.get_students().len()
            ));
        }
    }

    lines
}

pub fn render_week(store: &ClassSlotStore) -> Vec<String> {
    let window = store.get_window();
    let mut lines = vec![format!(
        "{} [{}/{}]",
        window.range_label(),
        window.get_offset(),
        window.get_max_offset()
    )];

    lines.extend(render_buckets(&store.week_buckets()));
    lines
}

pub fn show_week(store: &ClassSlotStore) {
    for line in render_week(store).iter() {
        println!("{}", line);
    }
}

#[cfg(test)]
use crate::application::config::CalendarConfig;

#[cfg(test)]
use crate::entity::class_slot::ClassSlot;

#[cfg(test)]
use crate::entity::conflict::Candidate;

#[cfg(test)]
use crate::entity::time_of_day::TimeOfDay;

#[cfg(test)]
use chrono::NaiveDate;

#[test]
fn test_render_week_時刻順に揃えて表示されること() {
    let config = CalendarConfig::default();
    let candidate = |name: &str, time: &str| Candidate {
        name: name.to_string(),
        teacher: "Dana".to_string(),
        room: "Room 1".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        time: TimeOfDay::parse(time).unwrap(),
        duration_hours: 1.0,
    };
    let monday = config
        .day_names
        .name_of(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    let slots = vec![
        ClassSlot::new("c1".to_string(), &candidate("Geometry", "12:30"), monday.clone())
            .with_students(vec!["s1".to_string()]),
        ClassSlot::new("c2".to_string(), &candidate("Art", "09:00"), monday),
    ];
    let store = ClassSlotStore::new(
        config,
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        slots,
        vec![],
    );

    let lines = render_week(&store);

    assert_eq!(lines[0], "07.01 - 13.01 [0/4]");
    assert_eq!(lines[1], "ראשון (07.01)");
    assert_eq!(lines[2], "  -");
    assert_eq!(lines[3], "שני (08.01)");
    assert_eq!(lines[4], "  09:00  Art       Dana  Room 1  0");
    assert_eq!(lines[5], "  12:30  Geometry  Dana  Room 1  1");
    // 7曜日 + 空の日5つ分の "-" + スロット2行 + 見出し1行
    assert_eq!(lines.len(), 1 + 7 + 5 + 2);
}
