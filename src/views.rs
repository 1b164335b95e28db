//! Derived views over the consultation collection.
//!
//! Nothing here is stored: every view is recomputed from the current
//! snapshot and an explicit `now`, so callers re-evaluate on each render.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{Consultation, ConsultationCategory, ConsultationFilter};
use crate::schedule::{self, SectionTitle};

// ═══════════════════════════════════════════
// View types — serialised to the UI
// ═══════════════════════════════════════════

/// Consultations sharing one `date`, ordered by time.
#[derive(Debug, Clone, Serialize)]
pub struct DaySection {
    pub date: String,
    pub title: SectionTitle,
    pub label: String,
    pub consultations: Vec<Consultation>,
}

/// The three disjoint categories, each in chronological order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorizedConsultations {
    pub upcoming: Vec<Consultation>,
    pub past: Vec<Consultation>,
    pub canceled: Vec<Consultation>,
}

impl CategorizedConsultations {
    pub fn get(&self, category: ConsultationCategory) -> &[Consultation] {
        match category {
            ConsultationCategory::Upcoming => &self.upcoming,
            ConsultationCategory::Past => &self.past,
            ConsultationCategory::Canceled => &self.canceled,
        }
    }

    pub fn total(&self) -> usize {
        self.upcoming.len() + self.past.len() + self.canceled.len()
    }
}

/// Everything the tabbed list screen renders.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultationTabs {
    pub upcoming: Vec<DaySection>,
    pub past: Vec<DaySection>,
    pub canceled: Vec<DaySection>,
    /// Badge on the upcoming tab; `None` hides it.
    pub upcoming_badge: Option<usize>,
    /// No consultations at all: show the empty state.
    pub is_empty: bool,
}

// ═══════════════════════════════════════════
// Derivations
// ═══════════════════════════════════════════

/// All records by `(date, time)` ascending; equal keys keep their order.
pub fn sorted(consultations: &[Consultation]) -> Vec<Consultation> {
    let mut out = consultations.to_vec();
    out.sort_by(schedule::chronological);
    out
}

/// Split into upcoming / past / canceled relative to `now`.
pub fn partition(consultations: &[Consultation], now: NaiveDateTime) -> CategorizedConsultations {
    let mut out = CategorizedConsultations::default();
    for c in sorted(consultations) {
        match schedule::categorize(&c, now) {
            ConsultationCategory::Upcoming => out.upcoming.push(c),
            ConsultationCategory::Past => out.past.push(c),
            ConsultationCategory::Canceled => out.canceled.push(c),
        }
    }
    out
}

/// Group by exact `date` string, groups ascending by date, entries by time.
pub fn group_by_day(consultations: &[Consultation], today: NaiveDate) -> Vec<DaySection> {
    let mut sections: Vec<DaySection> = Vec::new();
    for c in sorted(consultations) {
        match sections.last_mut() {
            Some(section) if section.date == c.date => section.consultations.push(c),
            _ => {
                let title = SectionTitle::for_date(&c.date, today);
                sections.push(DaySection {
                    date: c.date.clone(),
                    label: title.label(),
                    title,
                    consultations: vec![c],
                });
            }
        }
    }
    sections
}

/// Number of upcoming consultations, `None` when there are none.
pub fn upcoming_count(consultations: &[Consultation], now: NaiveDateTime) -> Option<usize> {
    let count = consultations
        .iter()
        .filter(|c| schedule::is_upcoming(c, now))
        .count();
    (count > 0).then_some(count)
}

/// Records matching every set field of `filter`, in chronological order.
pub fn filter(
    consultations: &[Consultation],
    filter: &ConsultationFilter,
    now: NaiveDateTime,
) -> Vec<Consultation> {
    let doctor = filter.doctor.as_ref().map(|d| d.to_lowercase());
    sorted(consultations)
        .into_iter()
        .filter(|c| {
            filter
                .category
                .map_or(true, |cat| schedule::categorize(c, now) == cat)
        })
        .filter(|c| {
            doctor
                .as_ref()
                .map_or(true, |d| c.doctor.to_lowercase().contains(d.as_str()))
        })
        .filter(|c| filter.specialty.as_ref().map_or(true, |s| &c.specialty == s))
        .filter(|c| filter.location.as_ref().map_or(true, |l| &c.location == l))
        .collect()
}

/// Tabbed summary: each category grouped by day, plus badge and empty flag.
pub fn tabs(consultations: &[Consultation], now: NaiveDateTime) -> ConsultationTabs {
    let today = now.date();
    let categorized = partition(consultations, now);
    let badge = categorized.upcoming.len();
    ConsultationTabs {
        upcoming: group_by_day(&categorized.upcoming, today),
        past: group_by_day(&categorized.past, today),
        canceled: group_by_day(&categorized.canceled, today),
        upcoming_badge: (badge > 0).then_some(badge),
        is_empty: consultations.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consultation(id: &str, date: &str, time: &str, canceled: bool) -> Consultation {
        Consultation {
            id: id.into(),
            date: date.into(),
            time: time.into(),
            doctor: format!("Dr. {id}"),
            specialty: "Cardiologista".into(),
            location: "Clínica Central".into(),
            canceled,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<Consultation> {
        vec![
            consultation("late", "2025-08-18", "16:00", false),
            consultation("early", "2025-08-18", "09:00", false),
            consultation("yesterday", "2025-08-16", "16:00", false),
            consultation("canceled", "2025-08-20", "10:00", true),
            consultation("noon", "2025-08-17", "12:00", false),
            consultation("morning", "2025-08-17", "08:00", false),
        ]
    }

    fn ids(cs: &[Consultation]) -> Vec<&str> {
        cs.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn sorted_orders_by_date_then_time() {
        let s = sorted(&sample());
        assert_eq!(
            ids(&s),
            vec!["yesterday", "morning", "noon", "early", "late", "canceled"]
        );
    }

    #[test]
    fn sorted_keeps_original_order_on_ties() {
        let cs = vec![
            consultation("b", "2025-08-16", "09:00", false),
            consultation("a", "2025-08-16", "09:00", false),
        ];
        assert_eq!(ids(&sorted(&cs)), vec!["b", "a"]);
    }

    #[test]
    fn partition_is_disjoint_and_exhaustive() {
        let cs = sample();
        let p = partition(&cs, now());
        assert_eq!(p.total(), cs.len());
        assert_eq!(ids(&p.upcoming), vec!["noon", "early", "late"]);
        assert_eq!(ids(&p.past), vec!["yesterday", "morning"]);
        assert_eq!(ids(&p.canceled), vec!["canceled"]);

        for c in &cs {
            let hits = ConsultationCategory::ALL
                .iter()
                .filter(|cat| p.get(**cat).iter().any(|x| x.id == c.id))
                .count();
            assert_eq!(hits, 1, "{} appears in {hits} categories", c.id);
        }
    }

    #[test]
    fn group_by_day_labels_and_orders_sections() {
        let p = partition(&sample(), now());
        let sections = group_by_day(&p.upcoming, now().date());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, SectionTitle::Today);
        assert_eq!(sections[0].label, "Today");
        assert_eq!(ids(&sections[0].consultations), vec!["noon"]);
        assert_eq!(sections[1].title, SectionTitle::Tomorrow);
        assert_eq!(ids(&sections[1].consultations), vec!["early", "late"]);

        let past = group_by_day(&p.past, now().date());
        assert_eq!(past[0].title, SectionTitle::Yesterday);
        assert_eq!(past[1].title, SectionTitle::Today);
    }

    #[test]
    fn upcoming_count_hides_zero() {
        assert_eq!(upcoming_count(&sample(), now()), Some(3));
        let only_past = vec![consultation("old", "2020-01-01", "08:00", false)];
        assert_eq!(upcoming_count(&only_past, now()), None);
        assert_eq!(upcoming_count(&[], now()), None);
    }

    #[test]
    fn filter_combines_fields() {
        let mut cs = sample();
        cs[0].doctor = "Dra. Fernanda Oliveira".into();
        cs[0].specialty = "Ortopedista".into();

        let by_doctor = ConsultationFilter {
            doctor: Some("fernanda".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&cs, &by_doctor, now())), vec!["late"]);

        let upcoming_cardio = ConsultationFilter {
            category: Some(ConsultationCategory::Upcoming),
            specialty: Some("Cardiologista".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&cs, &upcoming_cardio, now())), vec!["noon", "early"]);
    }

    #[test]
    fn tabs_summarize_everything() {
        let t = tabs(&sample(), now());
        assert!(!t.is_empty);
        assert_eq!(t.upcoming_badge, Some(3));
        assert_eq!(t.upcoming.len(), 2);
        assert_eq!(t.past.len(), 2);
        assert_eq!(t.canceled.len(), 1);
    }

    #[test]
    fn tabs_on_empty_collection() {
        let t = tabs(&[], now());
        assert!(t.is_empty);
        assert_eq!(t.upcoming_badge, None);
        assert!(t.upcoming.is_empty() && t.past.is_empty() && t.canceled.is_empty());
    }
}
