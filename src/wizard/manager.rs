//! WizardManager: owns the wizard state and runs the generation call.

use std::sync::Arc;

use chrono::{Days, Utc};
use tokio::sync::RwLock;

use crate::error::TransitionError;
use crate::generation::MentorGenerator;
use crate::model::Mentor;

use super::form::SearchForm;
use super::state::{Action, WizardState};
use super::step::Step;

/// Coordinates wizard transitions with the mentor generation call.
///
/// All state lives behind one lock; the lock is never held across the
/// generation call.
pub struct WizardManager {
    generator: Arc<MentorGenerator>,
    state: Arc<RwLock<WizardState>>,
}

impl WizardManager {
    pub fn new(generator: Arc<MentorGenerator>) -> Self {
        Self::with_state(generator, Arc::new(RwLock::new(WizardState::new())))
    }

    pub fn with_state(generator: Arc<MentorGenerator>, state: Arc<RwLock<WizardState>>) -> Self {
        Self { generator, state }
    }

    /// Shared handle to the state, for renderers.
    pub fn state(&self) -> Arc<RwLock<WizardState>> {
        Arc::clone(&self.state)
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> WizardState {
        self.state.read().await.clone()
    }

    pub async fn current_step(&self) -> Step {
        self.state.read().await.step
    }

    /// Apply a synchronous action.
    pub async fn dispatch(&self, action: Action) -> Result<Step, TransitionError> {
        let name = action.name();
        let result = self.state.write().await.apply(action);
        if let Err(ref e) = result {
            tracing::debug!(action = name, reason = %e, "Action rejected");
        }
        result
    }

    /// Book the selected mentor with a next-day placeholder date.
    pub async fn confirm_booking(&self) -> Result<Step, TransitionError> {
        let today = Utc::now().date_naive();
        let date = today.checked_add_days(Days::new(1)).unwrap_or(today);
        self.dispatch(Action::ConfirmBooking { date }).await
    }

    /// Submit the search form and fetch recommendations.
    ///
    /// The wizard is on Recommendations with `is_loading` set before the
    /// generation call starts. Generation failures are logged and leave an
    /// empty mentor list; only a rejected transition is returned as an error.
    pub async fn search(&self, form: SearchForm) -> Result<usize, TransitionError> {
        let request = {
            let mut state = self.state.write().await;
            state.apply(Action::RequestGeneration(form))?;
            match state.generation_request() {
                Some(request) => request,
                None => {
                    // Unreachable after a successful RequestGeneration; unstick the flag.
                    state.apply(Action::GenerationFinished(Vec::new()))?;
                    return Ok(0);
                }
            }
        };

        let mentors: Vec<Mentor> = match self.generator.generate(&request).await {
            Ok(mentors) => mentors,
            Err(e) => {
                tracing::warn!(error = %e, "Error generating mentors");
                Vec::new()
            }
        };

        let count = mentors.len();
        self.state
            .write()
            .await
            .apply(Action::GenerationFinished(mentors))?;
        Ok(count)
    }
}
