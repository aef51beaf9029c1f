use crate::entity::class_slot::ClassSlot;
use crate::entity::day_names::DayNames;
use crate::entity::week_window::WeekWindow;
use chrono::NaiveDate;

// カレンダーの1列
#[derive(Clone, Debug, PartialEq)]
pub struct DayBucket<'a> {
    pub day: String,
    pub date: Option<NaiveDate>,
    pub is_canonical: bool,
    pub slots: Vec<&'a ClassSlot>,
}

// 正規の7曜日の後ろに、データ中にだけ現れる曜日名を出現順に並べる
pub fn day_order(slots: &[ClassSlot], day_names: &DayNames) -> Vec<String> {
    let mut order: Vec<String> = day_names.get_names().to_vec();

    for slot in slots.iter() {
        let day = slot.get_day();
        if !order.iter().any(|d| d == day) {
            order.push(day.to_string());
        }
    }

    order
}

pub fn project_week<'a>(
    slots: &'a [ClassSlot],
    window: &WeekWindow,
    day_names: &DayNames,
) -> Vec<DayBucket<'a>> {
    let week_start = window.week_start();

    day_order(slots, day_names)
        .into_iter()
        .map(|day| {
            let mut matched: Vec<&ClassSlot> = slots
                .iter()
                .filter(|slot| window.contains(slot.get_date()) && slot.get_day() == day)
                .collect();
            matched.sort_by_key(|slot| slot.get_time());

            let is_canonical = day_names.is_canonical(&day);
            let date = if is_canonical {
                day_names.date_for(week_start, &day)
            } else {
                matched.first().map(|slot| slot.get_date())
            };

            DayBucket {
                day,
                date,
                is_canonical,
                slots: matched,
            }
        })
        .collect()
}

#[cfg(test)]
use crate::entity::conflict::Candidate;

#[cfg(test)]
use crate::entity::time_of_day::TimeOfDay;

#[cfg(test)]
use chrono::Weekday;

#[cfg(test)]
fn slot_on(id: &str, date: NaiveDate, time: &str, day_names: &DayNames) -> ClassSlot {
    let candidate = Candidate {
        name: format!("class-{}", id),
        teacher: "Dana".to_string(),
        room: "Room 1".to_string(),
        date,
        time: TimeOfDay::parse(time).unwrap(),
        duration_hours: 1.0,
    };
    ClassSlot::new(id.to_string(), &candidate, day_names.name_of(date))
}

#[cfg(test)]
fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_project_week_月曜と水曜だけでも7曜日全て返ること() {
    let day_names = DayNames::hebrew();
    let window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);
    let slots = vec![
        slot_on("mon", ymd(2024, 1, 8), "10:00", &day_names),
        slot_on("wed", ymd(2024, 1, 10), "12:00", &day_names),
    ];

    let buckets = project_week(&slots, &window, &day_names);

    assert_eq!(buckets.len(), 7);
    let days: Vec<&str> = buckets.iter().map(|b| b.day.as_str()).collect();
    assert_eq!(days, day_names.get_names().iter().map(|s| s.as_str()).collect::<Vec<_>>());

    assert_eq!(buckets[1].slots.len(), 1);
    assert_eq!(buckets[1].slots[0].get_id(), "mon");
    assert_eq!(buckets[3].slots[0].get_id(), "wed");
    assert_eq!(buckets.iter().filter(|b| b.day == "שני").count(), 1);
    assert_eq!(buckets.iter().map(|b| b.slots.len()).sum::<usize>(), 2);
}

#[test]
fn test_project_week_表示日付は週の先頭からの曜日番号で決まること() {
    let day_names = DayNames::hebrew();
    let mut window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);
    window.next_week();

    let buckets = project_week(&[], &window, &day_names);

    assert_eq!(buckets[0].date, Some(ymd(2024, 1, 14)));
    assert_eq!(buckets[6].date, Some(ymd(2024, 1, 20)));
}

#[test]
fn test_project_week_別の週の同じ曜日は表示されないこと() {
    let day_names = DayNames::hebrew();
    let window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);
    let slots = vec![
        slot_on("this", ymd(2024, 1, 8), "10:00", &day_names),
        slot_on("next", ymd(2024, 1, 15), "10:00", &day_names),
    ];

    let buckets = project_week(&slots, &window, &day_names);
    let ids: Vec<&str> = buckets[1].slots.iter().map(|s| s.get_id()).collect();

    assert_eq!(ids, vec!["this"]);
}

#[test]
fn test_project_week_時刻順に並ぶこと() {
    let day_names = DayNames::hebrew();
    let window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);
    let slots = vec![
        slot_on("late", ymd(2024, 1, 8), "18:00", &day_names),
        slot_on("early", ymd(2024, 1, 8), "09:00", &day_names),
        slot_on("noon", ymd(2024, 1, 8), "12:30", &day_names),
    ];

    let buckets = project_week(&slots, &window, &day_names);
    let ids: Vec<&str> = buckets[1].slots.iter().map(|s| s.get_id()).collect();

    assert_eq!(ids, vec!["early", "noon", "late"]);
}

#[test]
fn test_project_week_正規でない曜日名は後ろに追加されること() {
    let day_names = DayNames::hebrew();
    let window = WeekWindow::new(ymd(2024, 1, 10), Weekday::Sun, 4);
    let slots = vec![
        slot_on("x", ymd(2024, 1, 9), "10:00", &day_names).with_day_label("Holiday".to_string()),
        slot_on("y", ymd(2024, 3, 1), "10:00", &day_names).with_day_label("Makeup".to_string()),
        slot_on("z", ymd(2024, 1, 11), "10:00", &day_names).with_day_label("Holiday".to_string()),
    ];

    let buckets = project_week(&slots, &window, &day_names);

    assert_eq!(buckets.len(), 9);
    assert_eq!(buckets[7].day, "Holiday");
    assert!(!buckets[7].is_canonical);
    assert_eq!(buckets[7].slots.len(), 2);
    assert_eq!(buckets[7].date, Some(ymd(2024, 1, 9)));

    // 週の外にしかないものは空で日付なし
    assert_eq!(buckets[8].day, "Makeup");
    assert!(buckets[8].slots.is_empty());
    assert_eq!(buckets[8].date, None);
}
