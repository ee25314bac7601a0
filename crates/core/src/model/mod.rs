//! Entity records stored by the clinic.
//!
//! These are plain data carriers. Field names on the wire and in stored documents are
//! camelCase (`patientId`, `medicalHistory`, ...). Every record is keyed by a business
//! identifier ([`RecordKey`](carehub_types::RecordKey)), never by a storage-internal id.

pub mod appointment;
pub mod bill;
pub mod doctor;
pub mod patient;
pub mod user;

pub use appointment::Appointment;
pub use bill::Bill;
pub use doctor::Doctor;
pub use patient::{Gender, MedicalRecord, Medication, Patient};
pub use user::{User, UserRole};
