pub mod cache;
pub mod cli;
pub mod commands;
pub mod diff;
pub mod error;
pub mod group;
pub mod jenkins;
pub mod present;
pub mod project_config;
pub mod setup;
pub mod spinner;
pub mod term;
pub mod token_store;
pub mod user_config;
