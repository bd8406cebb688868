//! Sonar CLI Library
//!
//! Terminal address bar over the Sonar suggestion engine, plus the headless
//! `suggest`, `resolve` and `verify-sites` commands.

pub mod app;
pub mod headless;
pub mod tui;
pub mod ui;
pub mod verify_cmd;
