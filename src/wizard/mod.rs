//! Mentorship wizard: the step machine a mentee walks from name entry to a
//! booked session.
//!
//! `WizardState::apply` is the reducer: every user action is validated
//! against the current step and selections and either rejected (the state is
//! untouched) or applied. `WizardManager` wraps the state for async callers
//! and runs the single generation call a search needs.

pub mod form;
pub mod manager;
pub mod state;
pub mod step;

pub use form::{SearchCriteria, SearchForm};
pub use manager::WizardManager;
pub use state::{Action, Dashboard, WizardState, reduce};
pub use step::Step;
