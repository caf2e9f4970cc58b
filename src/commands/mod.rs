pub mod run;
pub mod show_config;
pub mod trigger;
