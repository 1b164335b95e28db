use super::enums::ConsultationCategory;

#[derive(Debug, Default, Clone)]
pub struct ConsultationFilter {
    pub category: Option<ConsultationCategory>,
    /// Case-insensitive substring match on the doctor's name.
    pub doctor: Option<String>,
    /// Exact specialty match.
    pub specialty: Option<String>,
    pub location: Option<String>,
}
