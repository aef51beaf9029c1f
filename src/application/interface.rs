use crate::application::config::CalendarConfig;
use crate::application::error::FixtureError;
use crate::entity::class_slot::ClassSlot;
use crate::entity::student::Student;
use chrono::NaiveDate;

pub trait FixtureRepositoryTrait {
    fn sync_clock(&mut self, today: NaiveDate);
    fn get_today(&self) -> NaiveDate;
    fn load(&mut self) -> Result<(), FixtureError>;
    fn get_config(&self) -> &CalendarConfig;
    fn get_students(&self) -> &[Student];
    fn get_class_slots(&self) -> &[ClassSlot];
}
