use chrono::Local;
use classdesk::adapter::gateway::fixture_repository::FixtureRepository;
use classdesk::application::class_slot_store::ClassSlotStore;
use classdesk::application::interface::FixtureRepositoryTrait;
use classdesk::application::show_week::show_week;
use env_logger::Env;
use log::{error, warn};
use std::env;
use std::process;
use termion::style;

const TITLE: &str = "classdesk";

fn parse_week_offset(arg: Option<&String>) -> i64 {
    match arg {
        Some(s) => match s.parse::<i64>() {
            Ok(offset) => offset,
            Err(_) => {
                warn!("week offset is not a number: {}", s);
                0
            }
        },
        None => 0,
    }
}

#[test]
fn test_parse_week_offset_正常系() {
    assert_eq!(parse_week_offset(Some(&"2".to_string())), 2);
    assert_eq!(parse_week_offset(Some(&"-1".to_string())), -1);
}

#[test]
fn test_parse_week_offset_数値でない場合は今週() {
    assert_eq!(parse_week_offset(Some(&"next".to_string())), 0);
    assert_eq!(parse_week_offset(None), 0);
}

// classdesk [fixtures_dir] [week_offset]
// fixtures_dirを省略した場合は組み込みの初期データを使う
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();

    let mut repository = match args.get(1) {
        Some(dir) => FixtureRepository::new(dir),
        None => FixtureRepository::builtin(),
    };
    repository.sync_clock(Local::now().date_naive());

    if let Err(err) = repository.load() {
        error!("{}", err);
        process::exit(1);
    }

    let mut store = ClassSlotStore::from_repository(&repository);
    store.set_week_offset(parse_week_offset(args.get(2)));

    println!("{}{}{}", style::Bold, TITLE, style::Reset);
    show_week(&store);
}
