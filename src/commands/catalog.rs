//! Selection catalog for the "new consultation" form (static data).

use serde::Serialize;

use crate::seed::{self, Doctor, Location, Specialty};

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub specialties: Vec<Specialty>,
    pub doctors: Vec<Doctor>,
    pub locations: Vec<Location>,
}

/// Returns every specialty, doctor and location.
pub fn get_catalog() -> Catalog {
    Catalog {
        specialties: seed::SPECIALTIES.to_vec(),
        doctors: seed::DOCTORS.to_vec(),
        locations: seed::LOCATIONS.to_vec(),
    }
}

/// Doctors offering the given specialty; unknown ids yield an error.
pub fn get_doctors_for_specialty(specialty_id: u32) -> Result<Vec<Doctor>, String> {
    if !seed::SPECIALTIES.iter().any(|s| s.id == specialty_id) {
        return Err(format!("Unknown specialty: {specialty_id}"));
    }
    Ok(seed::doctors_for_specialty(specialty_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_all_entries() {
        let catalog = get_catalog();
        assert_eq!(catalog.specialties.len(), 3);
        assert_eq!(catalog.doctors.len(), 9);
        assert_eq!(catalog.locations.len(), 3);
    }

    #[test]
    fn doctors_for_known_specialty() {
        let doctors = get_doctors_for_specialty(2).unwrap();
        assert!(doctors.iter().any(|d| d.name == "Dra. Ana Beatriz Costa"));
        assert!(doctors.iter().all(|d| d.specialty_id == 2));
    }

    #[test]
    fn unknown_specialty_is_rejected() {
        assert!(get_doctors_for_specialty(42).is_err());
    }
}
