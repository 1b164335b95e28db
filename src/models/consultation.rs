use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::StoreError;

/// Stored date encoding.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Stored time encoding (24h).
pub const TIME_FORMAT: &str = "%H:%M";

/// One scheduled (or formerly scheduled) medical appointment.
///
/// `date` and `time` are always kept in their string encodings
/// (`YYYY-MM-DD`, `HH:MM`), never as structured values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub date: String,
    pub time: String,
    pub doctor: String,
    pub specialty: String,
    pub location: String,
    #[serde(default)]
    pub canceled: bool,
}

/// Data for a new consultation: no id, never canceled.
#[derive(Debug, Clone)]
pub struct ConsultationInput {
    pub date: DateValue,
    pub time: TimeValue,
    pub doctor: String,
    pub specialty: String,
    pub location: String,
}

impl ConsultationInput {
    /// Build the stored record under `id`, normalizing date and time.
    pub fn into_consultation(self, id: String) -> Result<Consultation, StoreError> {
        Ok(Consultation {
            id,
            date: self.date.normalize()?,
            time: self.time.normalize()?,
            doctor: self.doctor,
            specialty: self.specialty,
            location: self.location,
            canceled: false,
        })
    }
}

/// A calendar date, either pre-formatted or structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Text(String),
    Date(NaiveDate),
}

impl DateValue {
    /// `YYYY-MM-DD` encoding. Text input must already parse as a date.
    pub fn normalize(&self) -> Result<String, StoreError> {
        match self {
            Self::Date(d) => Ok(d.format(DATE_FORMAT).to_string()),
            Self::Text(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(|d| d.format(DATE_FORMAT).to_string())
                .map_err(|_| StoreError::InvalidDate(s.clone())),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Date(dt.date())
    }
}

impl From<&str> for DateValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DateValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A wall-clock time, either pre-formatted or structured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeValue {
    Text(String),
    Time(NaiveTime),
}

impl TimeValue {
    /// `HH:MM` encoding. Seconds are dropped; `9:05` becomes `09:05`.
    pub fn normalize(&self) -> Result<String, StoreError> {
        match self {
            Self::Time(t) => Ok(t.format(TIME_FORMAT).to_string()),
            Self::Text(s) => {
                let trimmed = s.trim();
                NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
                    .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .map_err(|_| StoreError::InvalidTime(s.clone()))
            }
        }
    }
}

impl From<NaiveTime> for TimeValue {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for TimeValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Time(dt.time())
    }
}

impl From<&str> for TimeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// Older payloads stored numeric ids.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ConsultationInput {
        ConsultationInput {
            date: NaiveDate::from_ymd_opt(2025, 8, 16).unwrap().into(),
            time: NaiveTime::from_hms_opt(9, 5, 42).unwrap().into(),
            doctor: "Dr. Rafael Martins".into(),
            specialty: "Orthopedist".into(),
            location: "Med Imagem".into(),
        }
    }

    #[test]
    fn structured_values_are_encoded_as_strings() {
        let c = input().into_consultation("abc".into()).unwrap();
        assert_eq!(c.date, "2025-08-16");
        assert_eq!(c.time, "09:05");
        assert!(!c.canceled);
    }

    #[test]
    fn text_time_is_zero_padded() {
        assert_eq!(TimeValue::from("9:05").normalize().unwrap(), "09:05");
        assert_eq!(TimeValue::from("16:00:30").normalize().unwrap(), "16:00");
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(matches!(
            DateValue::from("16/08/2025").normalize(),
            Err(StoreError::InvalidDate(_))
        ));
        assert!(matches!(
            TimeValue::from("25:00").normalize(),
            Err(StoreError::InvalidTime(_))
        ));
    }

    #[test]
    fn datetime_splits_into_date_and_time() {
        let dt = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(DateValue::from(dt).normalize().unwrap(), "2025-09-01");
        assert_eq!(TimeValue::from(dt).normalize().unwrap(), "10:00");
    }

    #[test]
    fn deserialize_accepts_numeric_id_and_missing_canceled() {
        let json = r#"{"id": 1723800000000, "date": "2025-08-16", "time": "16:00",
                       "doctor": "Dr. João Silva", "specialty": "Cardiologist",
                       "location": "Hospital São Marcos"}"#;
        let c: Consultation = serde_json::from_str(json).unwrap();
        assert_eq!(c.id, "1723800000000");
        assert!(!c.canceled);
    }

    #[test]
    fn serialized_shape_uses_plain_field_names() {
        let c = input().into_consultation("7".into()).unwrap();
        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["id"], "7");
        assert_eq!(value["date"], "2025-08-16");
        assert_eq!(value["canceled"], false);
    }
}
