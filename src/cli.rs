//! Terminal front end: renders wizard steps as text and turns typed
//! commands into wizard actions.

use std::fmt::Write as _;

use crate::error::TransitionError;
use crate::model::{
    BudgetRange, DayOfWeek, ExperienceLevel, Industry, Language, LearningGoal, TimeSlot,
};
use crate::wizard::{Action, SearchForm, Step, WizardManager, WizardState};

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Name(String),
    Goal(LearningGoal),
    LearnMore,
    Industry(Industry),
    Level(ExperienceLevel),
    Language(Language),
    Budget(BudgetRange),
    Day(DayOfWeek),
    Slot(TimeSlot),
    Search,
    View(usize),
    Book,
    Dashboard,
    More,
    Back,
    Reset,
}

pub const HELP: &str = "\
Commands:
  name <your name>        tell us who you are
  goal <n>                pick a learning goal
  why                     how mentorship works
  industry|level|language|budget <n>
                          set a search field
  day <n> / slot <n>      toggle a preferred day / time slot
  search                  find mentors
  view <n>                open a mentor profile
  book                    book the open mentor
  dashboard               go to your dashboard
  more                    discover more mentors (from the dashboard)
  back / reset / help / quit";

/// Pick an option by 1-based number or by label (case-insensitive).
fn pick<T: Copy + std::fmt::Display>(options: &[T], arg: &str) -> Option<T> {
    let arg = arg.trim();
    if let Ok(n) = arg.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options
        .iter()
        .copied()
        .find(|o| o.to_string().eq_ignore_ascii_case(arg))
}

fn pick_or<T: Copy + std::fmt::Display>(options: &[T], arg: &str, what: &str) -> Result<T, String> {
    pick(options, arg).ok_or_else(|| format!("Unknown {what}: {arg:?}"))
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "name" => Command::Name(rest.to_string()),
        "goal" => Command::Goal(pick_or(LearningGoal::ALL, rest, "goal")?),
        "why" => Command::LearnMore,
        "industry" => Command::Industry(pick_or(Industry::ALL, rest, "industry")?),
        "level" => Command::Level(pick_or(ExperienceLevel::ALL, rest, "level")?),
        "language" => Command::Language(pick_or(Language::ALL, rest, "language")?),
        "budget" => Command::Budget(pick_or(BudgetRange::ALL, rest, "budget")?),
        "day" => Command::Day(pick_or(DayOfWeek::ALL, rest, "day")?),
        "slot" => Command::Slot(pick_or(TimeSlot::OFFERED, rest, "time slot")?),
        "search" => Command::Search,
        "view" => {
            let n = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("Expected a mentor number, got {rest:?}"))?;
            Command::View(n - 1)
        }
        "book" => Command::Book,
        "dashboard" => Command::Dashboard,
        "more" => Command::More,
        "back" => Command::Back,
        "reset" => Command::Reset,
        "" => return Err("Type a command, or 'help'".to_string()),
        other => return Err(format!("Unknown command {other:?}; type 'help'")),
    };
    Ok(command)
}

fn numbered<T: std::fmt::Display>(out: &mut String, options: &[T], chosen: impl Fn(&T) -> bool) {
    for (i, option) in options.iter().enumerate() {
        let mark = if chosen(option) { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}. {option}", i + 1);
    }
}

/// Render the current step as text.
pub fn render(state: &WizardState, form: &SearchForm) -> String {
    let mut out = String::new();
    let progress = state.step.progress();
    let _ = writeln!(
        out,
        "── Mentorfy {}{} ──",
        "●".repeat(progress as usize),
        "○".repeat(5 - progress as usize)
    );

    match state.step {
        Step::Welcome => match &state.mentee_name {
            None => out.push_str("Let's start with you. What's your name? (name <your name>)\n"),
            Some(name) => {
                let _ = writeln!(out, "Welcome, {name}! Choose your primary focus (goal <n>):");
                numbered(&mut out, LearningGoal::ALL, |_| false);
                out.push_str("Not sure yet? Type 'why'.\n");
            }
        },
        Step::WhyMentorship => {
            out.push_str(
                "Mentors shorten the path: tell us your goal, we generate a shortlist of \
                 experienced people who match your industry, level, language, budget and \
                 schedule, and you book a session in a couple of steps.\n",
            );
        }
        Step::Search => {
            out.push_str("Refine your search:\n");
            let _ = writeln!(out, " industry:");
            numbered(&mut out, Industry::ALL, |i| form.industry == Some(*i));
            let _ = writeln!(out, " level:");
            numbered(&mut out, ExperienceLevel::ALL, |l| form.experience_level == Some(*l));
            let _ = writeln!(out, " language:");
            numbered(&mut out, Language::ALL, |l| form.language == Some(*l));
            let _ = writeln!(out, " budget:");
            numbered(&mut out, BudgetRange::ALL, |b| form.budget == Some(*b));
            let _ = writeln!(out, " day:");
            numbered(&mut out, DayOfWeek::ALL, |d| form.days.contains(d));
            let _ = writeln!(out, " slot:");
            numbered(&mut out, TimeSlot::OFFERED, |s| form.time_slots.contains(s));
            if form.is_complete() {
                out.push_str("Ready: type 'search'.\n");
            } else {
                let _ = writeln!(out, "Still needed: {}", form.missing().join(", "));
            }
        }
        Step::Recommendations => {
            if state.is_loading {
                out.push_str("Finding your matches...\n");
            } else if state.mentors.is_empty() {
                out.push_str("No mentors found. Try 'back' to adjust your search.\n");
            } else {
                out.push_str("Top recommended mentors (view <n>):\n");
                for (i, m) in state.mentors.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "  {}. {} — {} at {} · ★ {:.1} · {} / hr",
                        i + 1,
                        m.name,
                        m.role,
                        m.company,
                        m.rating,
                        m.hourly_rate
                    );
                }
            }
        }
        Step::ProfileView => {
            if let Some(m) = &state.selected_mentor {
                let _ = writeln!(out, "{} — {} at {} ({})", m.name, m.role, m.company, m.industry);
                let _ = writeln!(out, "{}", m.bio);
                let _ = writeln!(
                    out,
                    "★ {:.1} · {} sessions · {} / hr",
                    m.rating, m.session_count, m.hourly_rate
                );
                let _ = writeln!(out, "Style: {}", m.mentoring_style.join(", "));
                let _ = writeln!(out, "Speaks: {}", m.languages.join(", "));
                let _ = writeln!(out, "Available: {}", m.availability.join(", "));
                let _ = writeln!(out, "Slots: {}", m.time_slots.join(", "));
                for story in &m.success_stories {
                    let _ = writeln!(out, "  “{story}”");
                }
                out.push_str("Type 'book' to confirm a session.\n");
            }
        }
        Step::BookingConfirmed => {
            if let Some(m) = &state.selected_mentor {
                let name = state.mentee_name.as_deref().unwrap_or("there");
                let _ = writeln!(
                    out,
                    "Excellent, {name}! Your session with {} is confirmed.",
                    m.name
                );
                out.push_str("Type 'dashboard' or 'reset' to explore others.\n");
            }
        }
        Step::Dashboard => {
            let dashboard = state.dashboard();
            let _ = writeln!(out, "Hello, {}.", dashboard.mentee_name.unwrap_or("there"));
            if let Some(goal) = dashboard.goal {
                let _ = writeln!(out, "Tracking your progress in {goal}.");
            }
            let _ = writeln!(out, "Upcoming sessions ({}):", dashboard.sessions.len());
            if dashboard.sessions.is_empty() {
                out.push_str("  No sessions found. Type 'more' to find your first mentor.\n");
            }
            for s in dashboard.sessions {
                let _ = writeln!(out, "  {} · {} {} · {}", s.mentor.name, s.date, s.time, s.status);
            }
            if !dashboard.shortlist.is_empty() {
                out.push_str("Personalized shortlist (view <n>):\n");
                for (i, m) in dashboard.shortlist.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {} — {} / hr", i + 1, m.name, m.hourly_rate);
                }
            }
        }
    }
    out
}

/// Result of handling one command.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// Drives a `WizardManager` from text commands.
pub struct Cli {
    manager: WizardManager,
    form: SearchForm,
}

impl Cli {
    pub fn new(manager: WizardManager) -> Self {
        Self {
            manager,
            form: SearchForm::default(),
        }
    }

    pub async fn screen(&self) -> String {
        render(&self.manager.snapshot().await, &self.form)
    }

    async fn dispatch(&self, action: Action) -> Result<(), TransitionError> {
        self.manager.dispatch(action).await.map(|_| ())
    }

    /// Handle one line of input, returning what to show next.
    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        let command = match parse_command(line) {
            Ok(c) => c,
            Err(msg) => return Outcome::Continue(msg),
        };

        let result = match command {
            Command::Quit => return Outcome::Quit,
            Command::Help => return Outcome::Continue(HELP.to_string()),
            Command::Name(name) => self.dispatch(Action::SubmitName(name)).await,
            Command::Goal(goal) => self.dispatch(Action::SelectGoal(goal)).await,
            Command::LearnMore => self.dispatch(Action::LearnMore).await,
            Command::Industry(_)
            | Command::Level(_)
            | Command::Language(_)
            | Command::Budget(_)
            | Command::Day(_)
            | Command::Slot(_) => self.edit_form(command).await,
            Command::Search => {
                let form = self.form.clone();
                match self.manager.search(form).await {
                    Ok(_) => {
                        self.form = SearchForm::default();
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
            Command::View(index) => {
                let id = {
                    let state = self.manager.state();
                    let state = state.read().await;
                    state.mentors.get(index).map(|m| m.id.clone())
                };
                match id {
                    Some(id) => self.dispatch(Action::SelectMentor(id)).await,
                    None => return Outcome::Continue(format!("No mentor number {}", index + 1)),
                }
            }
            Command::Book => self.manager.confirm_booking().await.map(|_| ()),
            Command::Dashboard => self.dispatch(Action::GoToDashboard).await,
            Command::More => self.dispatch(Action::FindMore).await,
            Command::Back => self.dispatch(Action::Back).await,
            Command::Reset => {
                self.form = SearchForm::default();
                self.dispatch(Action::Reset).await
            }
        };

        match result {
            Ok(()) => Outcome::Continue(self.screen().await),
            Err(e) => Outcome::Continue(format!("Can't do that: {e}")),
        }
    }

    async fn edit_form(&mut self, command: Command) -> Result<(), TransitionError> {
        let step = self.manager.current_step().await;
        if step != Step::Search {
            return Err(TransitionError::NotAllowed {
                action: "edit_search",
                step,
            });
        }
        match command {
            Command::Industry(v) => self.form.industry = Some(v),
            Command::Level(v) => self.form.experience_level = Some(v),
            Command::Language(v) => self.form.language = Some(v),
            Command::Budget(v) => self.form.budget = Some(v),
            Command::Day(v) => self.form.toggle_day(v),
            Command::Slot(v) => self.form.toggle_slot(v),
            _ => {}
        }
        Ok(())
    }
}
