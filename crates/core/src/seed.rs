//! Default accounts and sample records for a fresh store.

use crate::model::{Doctor, Gender, Patient, User, UserRole};
use crate::store::Repositories;
use crate::StoreResult;
use carehub_types::{Age, RecordKey, ValueError};

/// What [`seed_defaults`] inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub doctors: usize,
    pub patients: usize,
}

/// Seeds default users when the user collection is empty, and sample doctors and patients
/// when the doctor collection is empty. Collections that already hold records are left alone.
pub fn seed_defaults(repos: &Repositories) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    if repos.users.find_all()?.is_empty() {
        for user in default_users() {
            if repos.users.insert(user)? {
                report.users += 1;
            }
        }
        tracing::info!(count = report.users, "seeded default users");
    }

    if repos.doctors.find_all()?.is_empty() {
        for doctor in sample_doctors() {
            if repos.doctors.insert(doctor)? {
                report.doctors += 1;
            }
        }
        for patient in sample_patients() {
            if repos.patients.insert(patient)? {
                report.patients += 1;
            }
        }
        tracing::info!(
            doctors = report.doctors,
            patients = report.patients,
            "seeded sample doctors and patients"
        );
    }

    Ok(report)
}

fn default_users() -> Vec<User> {
    [
        ("admin", "admin123", UserRole::Admin),
        ("doctor1", "doc123", UserRole::Doctor),
        ("reception1", "recep123", UserRole::Receptionist),
    ]
    .into_iter()
    .filter_map(|(username, password, role)| {
        RecordKey::new(username)
            .ok()
            .map(|username| User::new(username, password, role))
    })
    .collect()
}

fn sample_doctors() -> Vec<Doctor> {
    [
        ("DOC1", "Dr. Smith", "Cardiology", "9AM-5PM"),
        ("DOC2", "Dr. Johnson", "Neurology", "10AM-6PM"),
        ("DOC3", "Dr. Williams", "Pediatrics", "8AM-4PM"),
    ]
    .into_iter()
    .filter_map(|(id, name, specialization, availability)| {
        RecordKey::new(id)
            .ok()
            .map(|id| Doctor::new(id, name, specialization, availability))
    })
    .collect()
}

fn sample_patients() -> Vec<Patient> {
    [
        ("PAT1", "John Doe", 35, Gender::Male, "123 Main St", "555-1234"),
        ("PAT2", "Jane Smith", 28, Gender::Female, "456 Oak Ave", "555-5678"),
        ("PAT3", "Robert Johnson", 45, Gender::Male, "789 Pine Rd", "555-9012"),
    ]
    .into_iter()
    .filter_map(|(id, name, age, gender, address, phone)| {
        sample_patient(id, name, age, gender, address, phone).ok()
    })
    .collect()
}

fn sample_patient(
    id: &str,
    name: &str,
    age: i64,
    gender: Gender,
    address: &str,
    phone: &str,
) -> Result<Patient, ValueError> {
    Ok(Patient::new(
        RecordKey::new(id)?,
        name,
        Age::new(age)?,
        gender,
        address,
        phone,
    ))
}
