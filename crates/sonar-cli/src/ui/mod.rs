//! TUI rendering components.

pub mod ghost;
mod render;
#[cfg(test)]
mod render_tests;

pub use render::{candidate_line, draw};
