//! Consultation commands consumed by the screens.
//!
//! Commands:
//! - `add_consultation`: validated creation from the form
//! - `get_consultation_details`: record + derived flags, `None` when missing
//! - `list_consultations`: upcoming / past / canceled tabs grouped by day
//! - `get_upcoming_badge`: badge count, `None` hides the badge
//! - `search_consultations`: filtered chronological list, category by tab name
//! - `cancel_consultation`, `reschedule_consultation`, `delete_consultation`
//!
//! Canceled consultations are never rescheduled: the command refuses
//! before the store is touched.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;
use crate::models::{Consultation, ConsultationCategory, ConsultationFilter, ConsultationInput};
use crate::schedule::{self, parse_date, parse_time};
use crate::views::ConsultationTabs;

const MAX_FIELD_LEN: usize = 200;

/// Form payload for a new consultation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:MM
    pub doctor: String,
    pub specialty: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub id: String,
    pub date: String,
    pub time: String,
}

/// Details screen model.
#[derive(Debug, Clone, Serialize)]
pub struct ConsultationDetails {
    pub consultation: Consultation,
    pub category: ConsultationCategory,
    pub display_date: String,
    pub can_reschedule: bool,
    pub can_cancel: bool,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Creates a consultation and returns its ID.
pub fn add_consultation(state: &CoreState, request: ConsultationRequest) -> Result<String, String> {
    add_consultation_at(state, request, now())
}

pub(crate) fn add_consultation_at(
    state: &CoreState,
    request: ConsultationRequest,
    now: NaiveDateTime,
) -> Result<String, String> {
    validate_required("Doctor", &request.doctor)?;
    validate_required("Specialty", &request.specialty)?;
    validate_required("Location", &request.location)?;

    let (date, time) = parse_entry(&request.date, &request.time)?;
    schedule::validate_entry(date, time, now).map_err(|e| e.to_string())?;

    let store = state.store().map_err(|e| e.to_string())?;
    let id = store
        .add(ConsultationInput {
            date: date.into(),
            time: time.into(),
            doctor: request.doctor.trim().to_string(),
            specialty: request.specialty.trim().to_string(),
            location: request.location.trim().to_string(),
        })
        .map_err(|e| e.to_string())?;

    tracing::info!(id = %id, "Consultation scheduled");
    Ok(id)
}

/// Returns the consultation plus derived flags, or `None` when not found.
pub fn get_consultation_details(
    state: &CoreState,
    id: &str,
) -> Result<Option<ConsultationDetails>, String> {
    get_consultation_details_at(state, id, now())
}

pub(crate) fn get_consultation_details_at(
    state: &CoreState,
    id: &str,
    now: NaiveDateTime,
) -> Result<Option<ConsultationDetails>, String> {
    let store = state.store().map_err(|e| e.to_string())?;
    Ok(store.get_by_id(id).map(|c| ConsultationDetails {
        category: schedule::categorize(&c, now),
        display_date: schedule::format_display_date(&c.date, now.date()),
        can_reschedule: schedule::can_reschedule(&c),
        can_cancel: schedule::can_cancel(&c),
        consultation: c,
    }))
}

/// Tabs for the list screen.
pub fn list_consultations(state: &CoreState) -> Result<ConsultationTabs, String> {
    let store = state.store().map_err(|e| e.to_string())?;
    Ok(store.tabs(now()))
}

/// Upcoming count for the tab badge.
pub fn get_upcoming_badge(state: &CoreState) -> Result<Option<usize>, String> {
    let store = state.store().map_err(|e| e.to_string())?;
    Ok(store.upcoming_count(now()))
}

/// Search form payload. `category` is the tab name: upcoming, past or canceled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub category: Option<String>,
    pub doctor: Option<String>,
    pub specialty: Option<String>,
    pub location: Option<String>,
}

impl SearchRequest {
    fn into_filter(self) -> Result<ConsultationFilter, String> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<ConsultationCategory>)
            .transpose()
            .map_err(|e| e.to_string())?;
        Ok(ConsultationFilter {
            category,
            doctor: non_blank(self.doctor),
            specialty: non_blank(self.specialty),
            location: non_blank(self.location),
        })
    }
}

pub fn search_consultations(
    state: &CoreState,
    request: SearchRequest,
) -> Result<Vec<Consultation>, String> {
    let filter = request.into_filter()?;
    let store = state.store().map_err(|e| e.to_string())?;
    Ok(crate::views::filter(&store.consultations(), &filter, now()))
}

/// Cancels a consultation. Returns false if it was missing or already canceled.
pub fn cancel_consultation(state: &CoreState, id: &str) -> Result<bool, String> {
    let store = state.store().map_err(|e| e.to_string())?;
    Ok(store.cancel(id))
}

/// Moves a consultation to a new date/time.
pub fn reschedule_consultation(
    state: &CoreState,
    request: RescheduleRequest,
) -> Result<(), String> {
    reschedule_consultation_at(state, request, now())
}

pub(crate) fn reschedule_consultation_at(
    state: &CoreState,
    request: RescheduleRequest,
    now: NaiveDateTime,
) -> Result<(), String> {
    let store = state.store().map_err(|e| e.to_string())?;
    let current = store
        .get_by_id(&request.id)
        .ok_or_else(|| "Consultation not found".to_string())?;
    if !schedule::can_reschedule(&current) {
        return Err("Canceled consultations cannot be rescheduled".into());
    }

    let (date, time) = parse_entry(&request.date, &request.time)?;
    schedule::validate_entry(date, time, now).map_err(|e| e.to_string())?;

    store
        .reschedule(&request.id, date, time)
        .map_err(|e| e.to_string())?;
    Ok(())
}

/// Hard-deletes a consultation. Returns false if it was already gone.
pub fn delete_consultation(state: &CoreState, id: &str) -> Result<bool, String> {
    let store = state.store().map_err(|e| e.to_string())?;
    Ok(store.remove(id))
}

fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.len() > MAX_FIELD_LEN {
        return Err(format!("{field} too long"));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_entry(
    date: &str,
    time: &str,
) -> Result<(chrono::NaiveDate, chrono::NaiveTime), String> {
    let date = parse_date(date.trim()).ok_or("Invalid date format. Use YYYY-MM-DD")?;
    let time = parse_time(time.trim()).ok_or("Invalid time format. Use HH:MM")?;
    Ok((date, time))
}
