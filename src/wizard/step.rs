//! Wizard steps and the edges between them.

use serde::{Deserialize, Serialize};

/// The screens of the mentorship wizard.
///
/// Forward path: Welcome → Search → Recommendations → ProfileView →
/// BookingConfirmed → Dashboard, with WhyMentorship as a side branch off
/// Welcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    WhyMentorship,
    Search,
    Recommendations,
    ProfileView,
    BookingConfirmed,
    Dashboard,
}

impl Step {
    /// Check if a forward transition from `self` to `target` exists.
    ///
    /// Back-edges and reset are handled by [`Step::previous`] and are not
    /// listed here.
    pub fn can_transition_to(&self, target: Step) -> bool {
        use Step::*;
        matches!(
            (self, target),
            (Welcome, WhyMentorship)
                | (Welcome, Search)
                | (Search, Recommendations)
                | (Recommendations, ProfileView)
                | (Dashboard, ProfileView)
                | (ProfileView, BookingConfirmed)
                | (BookingConfirmed, Dashboard)
                | (Dashboard, Search)
                | (Dashboard, Welcome)
        )
    }

    /// The step a back action returns to. Welcome has no predecessor.
    pub fn previous(&self) -> Option<Step> {
        use Step::*;
        match self {
            Welcome => None,
            WhyMentorship | Search | Dashboard => Some(Welcome),
            Recommendations => Some(Search),
            ProfileView => Some(Recommendations),
            BookingConfirmed => Some(ProfileView),
        }
    }

    /// Position on the five-segment progress bar.
    pub fn progress(&self) -> u8 {
        match self {
            Self::Welcome | Self::WhyMentorship | Self::Dashboard => 1,
            Self::Search => 2,
            Self::Recommendations => 3,
            Self::ProfileView => 4,
            Self::BookingConfirmed => 5,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Welcome => "welcome",
            Self::WhyMentorship => "why_mentorship",
            Self::Search => "search",
            Self::Recommendations => "recommendations",
            Self::ProfileView => "profile_view",
            Self::BookingConfirmed => "booking_confirmed",
            Self::Dashboard => "dashboard",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Step; 7] = [
        Step::Welcome,
        Step::WhyMentorship,
        Step::Search,
        Step::Recommendations,
        Step::ProfileView,
        Step::BookingConfirmed,
        Step::Dashboard,
    ];

    #[test]
    fn forward_path() {
        use Step::*;
        let path = [Welcome, Search, Recommendations, ProfileView, BookingConfirmed, Dashboard];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} should transition to {}",
                pair[0],
                pair[1]
            );
        }
        assert!(Welcome.can_transition_to(WhyMentorship));
    }

    #[test]
    fn invalid_transitions() {
        use Step::*;
        assert!(!Welcome.can_transition_to(Recommendations));
        assert!(!Search.can_transition_to(ProfileView));
        assert!(!WhyMentorship.can_transition_to(Search));
        assert!(!BookingConfirmed.can_transition_to(BookingConfirmed));
    }

    #[test]
    fn every_step_but_welcome_has_a_predecessor() {
        for step in ALL {
            assert_eq!(step.previous().is_none(), step == Step::Welcome, "{step}");
        }
        assert_eq!(Step::Recommendations.previous(), Some(Step::Search));
        assert_eq!(Step::ProfileView.previous(), Some(Step::Recommendations));
    }

    #[test]
    fn progress_bar_positions() {
        let got: Vec<u8> = ALL.iter().map(Step::progress).collect();
        assert_eq!(got, [1, 1, 2, 3, 4, 5, 1]);
    }

    #[test]
    fn display_matches_serde() {
        for step in ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json, "Display and serde should match for {step:?}");
        }
    }
}
