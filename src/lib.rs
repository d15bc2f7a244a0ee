pub mod fetch;
pub mod schedule;
pub mod settings;
