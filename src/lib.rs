pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
pub mod monitor;
pub mod ui;
pub mod utils;
