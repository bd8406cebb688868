//! Address-bar application state.

mod state;

pub use state::{App, PageVisit};
