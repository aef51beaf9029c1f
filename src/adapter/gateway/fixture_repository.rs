use crate::adapter::gateway::yaml::{yaml_to_class_slot, yaml_to_config, yaml_to_student};
use crate::application::config::CalendarConfig;
use crate::application::error::FixtureError;
use crate::application::interface::FixtureRepositoryTrait;
use crate::entity::class_slot::ClassSlot;
use crate::entity::datetime::get_week_start;
use crate::entity::student::Student;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::fs::File;
use std::io::prelude::*;
use walkdir::WalkDir;
use yaml_rust::{Yaml, YamlLoader};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const STUDENTS_FILE_NAME: &str = "students.yaml";
pub const CLASSES_FILE_NAME: &str = "classes.yaml";

const BUILTIN_CONFIG: &str = include_str!("../../../fixtures/config.yaml");
const BUILTIN_STUDENTS: &str = include_str!("../../../fixtures/students.yaml");
const BUILTIN_CLASSES: &str = include_str!("../../../fixtures/classes.yaml");

enum FixtureSource {
    Dir(String),
    Builtin,
}

// 起動時に一度だけ読む静的データ。書き戻しはしない
pub struct FixtureRepository {
    source: FixtureSource,
    today: NaiveDate,
    config: CalendarConfig,
    students: Vec<Student>,
    class_slots: Vec<ClassSlot>,
}

impl FixtureRepository {
    pub fn new(fixtures_dir: &str) -> Self {
        Self::with_source(FixtureSource::Dir(fixtures_dir.to_string()))
    }

    pub fn builtin() -> Self {
        Self::with_source(FixtureSource::Builtin)
    }

    fn with_source(source: FixtureSource) -> Self {
        Self {
            source,
            today: Local::now().date_naive(),
            config: CalendarConfig::default(),
            students: vec![],
            class_slots: vec![],
        }
    }

    // (config, students, classes) の順に中身を返す。ファイルが無いものはNone
    fn read_dir(dir: &str) -> Result<[Option<(String, String)>; 3], FixtureError> {
        let mut texts: [Option<(String, String)>; 3] = [None, None, None];

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let index = match entry.file_name().to_str() {
                Some(CONFIG_FILE_NAME) => 0,
                Some(STUDENTS_FILE_NAME) => 1,
                Some(CLASSES_FILE_NAME) => 2,
                _ => continue,
            };

            let path = entry.path().display().to_string();
            if texts[index].is_some() {
                warn!("ignoring duplicate fixture file {}", path);
                continue;
            }

            let mut text = String::new();
            File::open(entry.path())
                .and_then(|mut file| file.read_to_string(&mut text))
                .map_err(|source| FixtureError::Io {
                    path: path.clone(),
                    source,
                })?;

            info!("found fixture file {}", path);
            texts[index] = Some((path, text));
        }

        Ok(texts)
    }

    fn builtin_texts() -> [Option<(String, String)>; 3] {
        [
            Some((CONFIG_FILE_NAME.to_string(), BUILTIN_CONFIG.to_string())),
            Some((STUDENTS_FILE_NAME.to_string(), BUILTIN_STUDENTS.to_string())),
            Some((CLASSES_FILE_NAME.to_string(), BUILTIN_CLASSES.to_string())),
        ]
    }

    pub fn load_from_str(
        &mut self,
        config_text: Option<&str>,
        students_text: Option<&str>,
        classes_text: Option<&str>,
    ) -> Result<(), FixtureError> {
        let config_doc = config_text.map(|t| parse_doc(CONFIG_FILE_NAME, t)).transpose()?;
        let students_doc = students_text
            .map(|t| parse_doc(STUDENTS_FILE_NAME, t))
            .transpose()?;
        let classes_doc = classes_text
            .map(|t| parse_doc(CLASSES_FILE_NAME, t))
            .transpose()?;

        self.config = match &config_doc {
            Some(doc) => yaml_to_config(doc)?,
            None => CalendarConfig::default(),
        };

        self.students = vec![];
        if let Some(doc) = &students_doc {
            for student_yaml in doc["students"].as_vec().unwrap_or(&vec![]).iter() {
                match yaml_to_student(student_yaml) {
                    Ok(student) => {
                        if self.students.iter().any(|s| s.id == student.id) {
                            warn!("skipping duplicate student {}", student.id);
                            continue;
                        }
                        self.students.push(student);
                    }
                    Err(err) => warn!("skipping student record: {}", err),
                }
            }
        }

        let base_week_start = get_week_start(self.today, 0, self.config.first_day_of_week);

        self.class_slots = vec![];
        if let Some(doc) = &classes_doc {
            for class_yaml in doc["classes"].as_vec().unwrap_or(&vec![]).iter() {
                match yaml_to_class_slot(class_yaml, &self.config, base_week_start) {
                    Ok(slot) => {
                        if self.class_slots.iter().any(|s| s.get_id() == slot.get_id()) {
                            warn!("skipping duplicate class {}", slot.get_id());
                            continue;
                        }
                        self.class_slots.push(slot);
                    }
                    Err(err) => warn!("skipping class record: {}", err),
                }
            }
        }

        info!(
            "loaded {} student(s) and {} class slot(s)",
            self.students.len(),
            self.class_slots.len()
        );

        Ok(())
    }
}

fn parse_doc(path: &str, text: &str) -> Result<Yaml, FixtureError> {
    let mut docs = YamlLoader::load_from_str(text).map_err(|err| FixtureError::Yaml {
        path: path.to_string(),
        message: err.to_string(),
    })?;

    if docs.is_empty() {
        return Ok(Yaml::Null);
    }

    Ok(docs.swap_remove(0))
}

impl FixtureRepositoryTrait for FixtureRepository {
    fn sync_clock(&mut self, today: NaiveDate) {
        self.today = today;
    }

    fn get_today(&self) -> NaiveDate {
        self.today
    }

    fn load(&mut self) -> Result<(), FixtureError> {
        let texts = match &self.source {
            FixtureSource::Dir(dir) => Self::read_dir(dir)?,
            FixtureSource::Builtin => Self::builtin_texts(),
        };
        let [config, students, classes] = texts;

        self.load_from_str(
            config.as_ref().map(|(_, t)| t.as_str()),
            students.as_ref().map(|(_, t)| t.as_str()),
            classes.as_ref().map(|(_, t)| t.as_str()),
        )
    }

    fn get_config(&self) -> &CalendarConfig {
        &self.config
    }

    fn get_students(&self) -> &[Student] {
        &self.students
    }

    fn get_class_slots(&self) -> &[ClassSlot] {
        &self.class_slots
    }
}

#[cfg(test)]
use crate::application::class_slot_store::ClassSlotStore;

#[test]
fn test_builtin_初期データが今週に並ぶこと() {
    let mut repository = FixtureRepository::builtin();
    repository.sync_clock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    repository.load().unwrap();

    assert_eq!(repository.get_students().len(), 5);
    assert_eq!(repository.get_class_slots().len(), 4);

    let store = ClassSlotStore::from_repository(&repository);
    let buckets = store.week_buckets();

    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets.iter().map(|b| b.slots.len()).sum::<usize>(), 4);
    assert_eq!(buckets[0].slots[0].get_id(), "c1");
    assert_eq!(
        buckets[0].slots[0].get_date(),
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    );
    assert!(store.get_attendance().has_entry("c1", "s3"));
}

#[test]
fn test_load_from_str_不正なレコードは読み飛ばすこと() {
    let mut repository = FixtureRepository::builtin();
    repository.sync_clock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());

    let students = "
students:
  - id: s1
    full_name: 'Ori Levi'
  - id: s2
  - id: s1
    full_name: 'Someone Else'
";
    let classes = "
classes:
  - id: c1
    name: Algebra
    date: '2024-01-10'
    time: '10:00'
  - id: c2
    name: Broken
    time: '10:00'
";

    repository
        .load_from_str(None, Some(students), Some(classes))
        .unwrap();

    assert_eq!(repository.get_students().len(), 1);
    assert_eq!(repository.get_students()[0].full_name, "Ori Levi");
    assert_eq!(repository.get_class_slots().len(), 1);
    assert_eq!(repository.get_config(), &CalendarConfig::default());
}

#[test]
fn test_load_from_str_yamlとして読めない場合はエラー() {
    let mut repository = FixtureRepository::builtin();
    let actual = repository.load_from_str(Some("key: [unclosed"), None, None);

    assert!(matches!(actual, Err(FixtureError::Yaml { .. })));
}

#[test]
fn test_load_ディレクトリが無い場合は空で読み込まれること() {
    let mut repository = FixtureRepository::new("/nonexistent/classdesk-fixtures");
    repository.load().unwrap();

    assert!(repository.get_students().is_empty());
    assert!(repository.get_class_slots().is_empty());
}

#[test]
fn test_load_ディレクトリから読めること() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");
    let mut repository = FixtureRepository::new(dir);
    repository.sync_clock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    repository.load().unwrap();

    assert_eq!(repository.get_students().len(), 5);
    assert_eq!(repository.get_class_slots().len(), 4);
    assert_eq!(repository.get_config().max_week_offset, 4);
}
