//! Wizard state and the reducer that moves it between steps.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::TransitionError;
use crate::generation::GenerationRequest;
use crate::model::{LearningGoal, Mentor, Session};

use super::form::{SearchCriteria, SearchForm};
use super::step::Step;

/// User actions (plus the generation result) the wizard reacts to.
#[derive(Debug, Clone)]
pub enum Action {
    SubmitName(String),
    LearnMore,
    SelectGoal(LearningGoal),
    RequestGeneration(SearchForm),
    GenerationFinished(Vec<Mentor>),
    SelectMentor(String),
    ConfirmBooking { date: NaiveDate },
    GoToDashboard,
    FindMore,
    Back,
    Reset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitName(_) => "submit_name",
            Self::LearnMore => "learn_more",
            Self::SelectGoal(_) => "select_goal",
            Self::RequestGeneration(_) => "request_generation",
            Self::GenerationFinished(_) => "generation_finished",
            Self::SelectMentor(_) => "select_mentor",
            Self::ConfirmBooking { .. } => "confirm_booking",
            Self::GoToDashboard => "go_to_dashboard",
            Self::FindMore => "find_more",
            Self::Back => "back",
            Self::Reset => "reset",
        }
    }
}

/// Everything the wizard knows about the current mentee.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub step: Step,
    pub mentee_name: Option<String>,
    pub goal: Option<LearningGoal>,
    pub criteria: Option<SearchCriteria>,
    /// Mentors from the latest search.
    pub mentors: Vec<Arc<Mentor>>,
    pub selected_mentor: Option<Arc<Mentor>>,
    pub is_loading: bool,
    /// Booked sessions, newest first.
    pub sessions: Vec<Session>,
}

/// What the dashboard shows.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    pub mentee_name: Option<&'a str>,
    pub goal: Option<LearningGoal>,
    pub sessions: &'a [Session],
    pub shortlist: &'a [Arc<Mentor>],
}

/// Number of held mentors the dashboard shortlists.
const SHORTLIST_LEN: usize = 2;

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the header's dashboard link is shown.
    pub fn dashboard_available(&self) -> bool {
        self.mentee_name.is_some() && !self.sessions.is_empty()
    }

    /// Whether `action` would be accepted, i.e. its control is enabled.
    pub fn can_apply(&self, action: &Action) -> bool {
        self.check(action).is_ok()
    }

    /// Validate `action` against the current state and return the step it
    /// would land on.
    pub fn check(&self, action: &Action) -> Result<Step, TransitionError> {
        let not_allowed = || TransitionError::NotAllowed {
            action: action.name(),
            step: self.step,
        };

        match action {
            Action::SubmitName(name) => {
                if self.step != Step::Welcome {
                    return Err(not_allowed());
                }
                if name.trim().is_empty() {
                    return Err(TransitionError::EmptyName);
                }
                Ok(Step::Welcome)
            }
            Action::LearnMore => self.forward(Step::WhyMentorship).ok_or_else(not_allowed),
            Action::SelectGoal(_) => {
                let target = self.forward(Step::Search).ok_or_else(not_allowed)?;
                if self.mentee_name.is_none() {
                    return Err(TransitionError::NameRequired);
                }
                Ok(target)
            }
            Action::RequestGeneration(form) => {
                let target = self.forward(Step::Recommendations).ok_or_else(not_allowed)?;
                // One generation call at a time, even after a reset abandoned the last one.
                if self.is_loading {
                    return Err(TransitionError::Busy);
                }
                if self.goal.is_none() {
                    return Err(not_allowed());
                }
                form.to_criteria()
                    .map_err(|missing| TransitionError::IncompleteCriteria { missing })?;
                Ok(target)
            }
            Action::GenerationFinished(_) => Ok(self.step),
            Action::SelectMentor(id) => {
                let target = self.forward(Step::ProfileView).ok_or_else(not_allowed)?;
                if self.is_loading {
                    return Err(TransitionError::Busy);
                }
                if self.find_mentor(id).is_none() {
                    return Err(TransitionError::UnknownMentor { id: id.clone() });
                }
                Ok(target)
            }
            Action::ConfirmBooking { .. } => {
                let target = self.forward(Step::BookingConfirmed).ok_or_else(not_allowed)?;
                if self.selected_mentor.is_none() {
                    return Err(TransitionError::NoMentorSelected);
                }
                Ok(target)
            }
            Action::GoToDashboard => {
                if self.step.can_transition_to(Step::Dashboard)
                    || self.step == Step::Dashboard
                    || self.dashboard_available()
                {
                    Ok(Step::Dashboard)
                } else {
                    Err(not_allowed())
                }
            }
            Action::FindMore => {
                let target = if self.goal.is_some() {
                    Step::Search
                } else {
                    Step::Welcome
                };
                self.forward(target).ok_or_else(not_allowed)
            }
            Action::Back => {
                let target = self.step.previous().ok_or_else(not_allowed)?;
                if self.step == Step::Recommendations && self.is_loading {
                    return Err(TransitionError::Busy);
                }
                Ok(target)
            }
            Action::Reset => Ok(Step::Welcome),
        }
    }

    /// Apply `action`, returning the new step.
    ///
    /// A rejected action leaves the state untouched.
    pub fn apply(&mut self, action: Action) -> Result<Step, TransitionError> {
        let target = self.check(&action)?;
        let from = self.step;

        match action {
            Action::SubmitName(name) => {
                self.mentee_name = Some(name.trim().to_string());
            }
            Action::SelectGoal(goal) => {
                self.goal = Some(goal);
            }
            Action::RequestGeneration(form) => {
                self.criteria = form.to_criteria().ok();
                self.mentors.clear();
                self.selected_mentor = None;
                self.is_loading = true;
            }
            Action::GenerationFinished(mentors) => {
                self.mentors = mentors.into_iter().map(Arc::new).collect();
                self.is_loading = false;
            }
            Action::SelectMentor(id) => {
                self.selected_mentor = self.find_mentor(&id).cloned();
            }
            Action::ConfirmBooking { date } => {
                if let Some(mentor) = &self.selected_mentor {
                    let session = Session::book(Arc::clone(mentor), date);
                    tracing::info!(
                        session_id = %session.id,
                        mentor = %mentor.name,
                        time = %session.time,
                        "Session booked"
                    );
                    self.sessions.insert(0, session);
                }
            }
            Action::Reset => {
                self.goal = None;
                self.criteria = None;
                self.mentors.clear();
                self.selected_mentor = None;
            }
            Action::LearnMore | Action::GoToDashboard | Action::FindMore | Action::Back => {}
        }

        self.step = target;
        if from != target {
            tracing::debug!(from = %from, to = %target, "Wizard step changed");
        }
        Ok(target)
    }

    /// The request a search on the current selections would issue.
    pub fn generation_request(&self) -> Option<GenerationRequest> {
        Some(GenerationRequest {
            goal: self.goal?,
            criteria: self.criteria.clone()?,
        })
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard {
            mentee_name: self.mentee_name.as_deref(),
            goal: self.goal,
            sessions: &self.sessions,
            shortlist: &self.mentors[..self.mentors.len().min(SHORTLIST_LEN)],
        }
    }

    fn find_mentor(&self, id: &str) -> Option<&Arc<Mentor>> {
        self.mentors.iter().find(|m| m.id == id)
    }

    fn forward(&self, target: Step) -> Option<Step> {
        self.step.can_transition_to(target).then_some(target)
    }
}

/// Pure reducer: the state after `action`, or the same state if the action
/// is not available.
pub fn reduce(mut state: WizardState, action: Action) -> WizardState {
    let name = action.name();
    if let Err(e) = state.apply(action) {
        tracing::debug!(action = name, step = %state.step, reason = %e, "Action ignored");
    }
    state
}
