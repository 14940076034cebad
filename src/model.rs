//! Domain types: the closed selection sets, generated mentors and booked sessions.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a closed set of labelled choices.
///
/// Each variant serializes as its display label so the values can be dropped
/// verbatim into prompts and compared against generated payloads.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in presentation order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Look up a value by its exact label.
            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.label() == label)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

labelled_enum! {
    /// What the mentee wants out of mentorship.
    LearningGoal {
        CareerTransition => "Career Transition",
        SkillMastery => "Skill Mastery",
        PortfolioReview => "Portfolio Review",
    }
}

labelled_enum! {
    Industry {
        Fintech => "Fintech",
        EdTech => "EdTech",
        SaaS => "SaaS",
        HealthTech => "HealthTech",
        ECommerce => "E-commerce",
        AiMl => "AI & ML",
    }
}

labelled_enum! {
    ExperienceLevel {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
        SeniorLead => "Senior/Lead",
    }
}

labelled_enum! {
    Language {
        English => "English",
        Spanish => "Spanish",
        French => "French",
        Mandarin => "Mandarin",
        Hindi => "Hindi",
        Arabic => "Arabic",
        Portuguese => "Portuguese",
    }
}

labelled_enum! {
    /// Per-session budget the mentee is willing to pay.
    BudgetRange {
        Free => "Free (Community)",
        Low => "$20 - $50",
        Mid => "$50 - $100",
        High => "$100+",
    }
}

labelled_enum! {
    DayOfWeek {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
    }
}

labelled_enum! {
    /// Hourly slot labels a mentor can advertise.
    TimeSlot {
        EightAm => "8:00 AM",
        NineAm => "9:00 AM",
        TenAm => "10:00 AM",
        ElevenAm => "11:00 AM",
        Noon => "12:00 PM",
        OnePm => "1:00 PM",
        TwoPm => "2:00 PM",
        ThreePm => "3:00 PM",
        FourPm => "4:00 PM",
        FivePm => "5:00 PM",
        SixPm => "6:00 PM",
        SevenPm => "7:00 PM",
        EightPm => "8:00 PM",
        NinePm => "9:00 PM",
    }
}

impl TimeSlot {
    /// The slots the search form lets a mentee pick from.
    pub const OFFERED: &'static [TimeSlot] = &[
        TimeSlot::EightAm,
        TimeSlot::TenAm,
        TimeSlot::Noon,
        TimeSlot::TwoPm,
        TimeSlot::FourPm,
        TimeSlot::SixPm,
        TimeSlot::EightPm,
    ];

    /// Slot used for a booking when the mentor advertises none.
    pub const BOOKING_DEFAULT: TimeSlot = TimeSlot::TenAm;
}

/// A generated mentor profile.
///
/// Field values other than `id`, `industry` and `avatar` are exactly what the
/// generation service returned; ranges asked for in the prompt are not
/// re-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: Industry,
    pub bio: String,
    pub success_stories: Vec<String>,
    pub mentoring_style: Vec<String>,
    pub avatar: String,
    pub rating: f64,
    pub session_count: u32,
    pub languages: Vec<String>,
    pub hourly_rate: String,
    pub availability: Vec<String>,
    pub time_slots: Vec<String>,
}

impl Mentor {
    /// Slot label a new booking with this mentor lands on.
    pub fn booking_time(&self) -> String {
        self.time_slots
            .first()
            .cloned()
            .unwrap_or_else(|| TimeSlot::BOOKING_DEFAULT.label().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Upcoming,
    Completed,
    Canceled,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

/// A (mock) booked session with a mentor from an earlier search.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub mentor: Arc<Mentor>,
    pub date: String,
    pub time: String,
    pub status: SessionStatus,
}

impl Session {
    /// Book an upcoming session on `date` at the mentor's first advertised slot.
    pub fn book(mentor: Arc<Mentor>, date: NaiveDate) -> Self {
        let time = mentor.booking_time();
        Self {
            id: Uuid::new_v4(),
            mentor,
            date: date.format("%b %-d, %Y").to_string(),
            time,
            status: SessionStatus::Upcoming,
        }
    }
}
