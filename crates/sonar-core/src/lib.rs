//! Sonar Core Library
//!
//! The address-bar engine of the Sonar browser:
//! - Local and remote suggestion sources, merged into one ranked page
//! - Input coordination (debounce, selection, commit, blur, voice)
//! - Navigation resolution for committed text
//! - Configuration resolution and hierarchy
//! - Common error types

pub mod config;
pub mod coordinator;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod navigation;
pub mod suggest;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod tracing_init;

pub use config::Config;
pub use coordinator::{
    CoordinatorEvent, CoordinatorState, CoordinatorTimings, InputCoordinator, NavKey, Navigator,
    QueryState,
};
pub use error::{Error, Result};
pub use navigation::{NavigationTarget, Resolver, url_bar_display};
pub use suggest::{Candidate, CandidateKind, SuggestionAggregator};
