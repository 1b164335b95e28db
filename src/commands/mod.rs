pub mod catalog;
pub mod consultations;
