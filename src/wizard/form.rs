//! Search form draft and the complete criteria it yields.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{BudgetRange, DayOfWeek, ExperienceLevel, Industry, Language, TimeSlot};

/// The search form as the mentee fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub industry: Option<Industry>,
    pub experience_level: Option<ExperienceLevel>,
    pub language: Option<Language>,
    pub budget: Option<BudgetRange>,
    pub days: BTreeSet<DayOfWeek>,
    pub time_slots: BTreeSet<TimeSlot>,
}

impl SearchForm {
    pub fn toggle_day(&mut self, day: DayOfWeek) {
        if !self.days.remove(&day) {
            self.days.insert(day);
        }
    }

    pub fn toggle_slot(&mut self, slot: TimeSlot) {
        if !self.time_slots.remove(&slot) {
            self.time_slots.insert(slot);
        }
    }

    /// Names of the fields still left to fill in.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.industry.is_none() {
            missing.push("industry");
        }
        if self.experience_level.is_none() {
            missing.push("experience level");
        }
        if self.language.is_none() {
            missing.push("language");
        }
        if self.budget.is_none() {
            missing.push("budget");
        }
        if self.days.is_empty() {
            missing.push("preferred days");
        }
        if self.time_slots.is_empty() {
            missing.push("time slots");
        }
        missing
    }

    /// Whether the search can be submitted.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Convert into complete criteria, or report which fields are missing.
    pub fn to_criteria(&self) -> Result<SearchCriteria, Vec<&'static str>> {
        match (self.industry, self.experience_level, self.language, self.budget) {
            (Some(industry), Some(experience_level), Some(language), Some(budget))
                if !self.days.is_empty() && !self.time_slots.is_empty() =>
            {
                Ok(SearchCriteria {
                    industry,
                    experience_level,
                    language,
                    budget,
                    days: self.days.clone(),
                    time_slots: self.time_slots.clone(),
                })
            }
            _ => Err(self.missing()),
        }
    }
}

/// A fully populated search, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub industry: Industry,
    pub experience_level: ExperienceLevel,
    pub language: Language,
    pub budget: BudgetRange,
    pub days: BTreeSet<DayOfWeek>,
    pub time_slots: BTreeSet<TimeSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SearchForm {
        let mut form = SearchForm {
            industry: Some(Industry::SaaS),
            experience_level: Some(ExperienceLevel::Intermediate),
            language: Some(Language::English),
            budget: Some(BudgetRange::Mid),
            ..Default::default()
        };
        form.toggle_day(DayOfWeek::Monday);
        form.toggle_slot(TimeSlot::TenAm);
        form
    }

    #[test]
    fn empty_form_lists_every_field() {
        let form = SearchForm::default();
        assert!(!form.is_complete());
        assert_eq!(form.missing().len(), 6);
    }

    #[test]
    fn toggles_add_and_remove() {
        let mut form = SearchForm::default();
        form.toggle_day(DayOfWeek::Friday);
        form.toggle_day(DayOfWeek::Monday);
        assert_eq!(form.days.len(), 2);
        form.toggle_day(DayOfWeek::Friday);
        assert_eq!(form.days.iter().copied().collect::<Vec<_>>(), [DayOfWeek::Monday]);
    }

    #[test]
    fn complete_form_converts() {
        let criteria = filled().to_criteria().unwrap();
        assert_eq!(criteria.industry, Industry::SaaS);
        assert!(criteria.time_slots.contains(&TimeSlot::TenAm));
    }

    #[test]
    fn clearing_last_slot_blocks_submit() {
        let mut form = filled();
        form.toggle_slot(TimeSlot::TenAm);
        assert!(!form.is_complete());
        assert_eq!(form.to_criteria().unwrap_err(), ["time slots"]);
    }
}
