//! First-run dataset and the selection catalog behind the "new
//! consultation" form.

use serde::Serialize;

use crate::models::Consultation;

/// Example consultations written on the very first launch only.
pub fn seed_consultations() -> Vec<Consultation> {
    vec![
        seed(
            "1",
            "2025-08-16",
            "16:00",
            "Dr. João Silva",
            "Cardiologista",
            "Hospital São Marcos",
            false,
        ),
        seed(
            "2",
            "2025-08-17",
            "17:30",
            "Dra. Ana Beatriz Costa",
            "Dermatologista",
            "Hospital Getúlio Vargas",
            false,
        ),
        seed(
            "3",
            "2025-08-18",
            "09:00",
            "Dra. Fernanda Oliveira",
            "Ortopedista",
            "Med Imagem",
            false,
        ),
        seed(
            "4",
            "2025-08-19",
            "09:00",
            "Dr. Rafael Martins",
            "Ortopedista",
            "Med Imagem",
            true,
        ),
    ]
}


fn seed(
    id: &str,
    date: &str,
    time: &str,
    doctor: &str,
    specialty: &str,
    location: &str,
    canceled: bool,
) -> Consultation {
    Consultation {
        id: id.into(),
        date: date.into(),
        time: time.into(),
        doctor: doctor.into(),
        specialty: specialty.into(),
        location: location.into(),
        canceled,
    }
}

// ═══════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Specialty {
    pub id: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Doctor {
    pub id: u32,
    pub name: &'static str,
    pub specialty_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub id: u32,
    pub name: &'static str,
}

pub const SPECIALTIES: &[Specialty] = &[
    Specialty { id: 1, name: "Cardiologista" },
    Specialty { id: 2, name: "Dermatologista" },
    Specialty { id: 3, name: "Ortopedista" },
];

pub const DOCTORS: &[Doctor] = &[
    Doctor { id: 1, name: "Dr. João Silva", specialty_id: 1 },
    Doctor { id: 2, name: "Dra. Maria Souza", specialty_id: 1 },
    Doctor { id: 3, name: "Dr. Pedro Almeida", specialty_id: 1 },
    Doctor { id: 4, name: "Dr. Lucas Pereira", specialty_id: 2 },
    Doctor { id: 5, name: "Dra. Ana Beatriz Costa", specialty_id: 2 },
    Doctor { id: 6, name: "Dr. Carlos Henrique", specialty_id: 2 },
    Doctor { id: 7, name: "Dra. Fernanda Oliveira", specialty_id: 3 },
    Doctor { id: 8, name: "Dr. Rafael Martins", specialty_id: 3 },
    Doctor { id: 9, name: "Dr. Gustavo Lima", specialty_id: 3 },
];

pub const LOCATIONS: &[Location] = &[
    Location { id: 1, name: "Clínica Central" },
    Location { id: 2, name: "Hospital São Lucas" },
    Location { id: 3, name: "Centro Médico Zona Sul" },
];

pub fn doctors_for_specialty(specialty_id: u32) -> Vec<Doctor> {
    DOCTORS
        .iter()
        .filter(|d| d.specialty_id == specialty_id)
        .copied()
        .collect()
}

pub fn specialty_of(doctor: &Doctor) -> Option<Specialty> {
    SPECIALTIES.iter().find(|s| s.id == doctor.specialty_id).copied()
}
