pub mod adapter {
    pub mod gateway {
        pub mod fixture_repository;
        pub mod yaml;
    }
}

pub mod application {
    pub mod class_slot_store;
    pub mod config;
    pub mod error;
    pub mod interface;
    pub mod show_week;
}

pub mod entity {
    pub mod attendance;
    pub mod calendar;
    pub mod charge;
    pub mod class_slot;
    pub mod conflict;
    pub mod datetime;
    pub mod day_names;
    pub mod error;
    pub mod student;
    pub mod time_of_day;
    pub mod week_window;
}
