//! Patient records and their managed sub-records.
//!
//! A patient carries three lists that are maintained separately from the demographic fields:
//! allergies, medications and medical history. Demographic updates must never touch them.

use crate::constants::{NO_DIAGNOSIS, PATIENTS_COLLECTION};
use crate::store::Entity;
use carehub_types::{Age, RecordKey};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    #[serde(alias = "male", alias = "MALE")]
    Male,
    #[serde(alias = "female", alias = "FEMALE")]
    Female,
    #[serde(alias = "other", alias = "OTHER")]
    Other,
}

/// A medication currently or previously prescribed to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

/// One visit entry in a patient's medical history.
///
/// `visitDate`/`visitTime` default to the moment the record is decoded when a client omits
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub record_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub diagnosis: String,
    pub treatment: String,
    pub notes: String,
    #[serde(default = "today")]
    pub visit_date: String,
    #[serde(default = "now_hh_mm")]
    pub visit_time: String,
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn now_hh_mm() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[schema(value_type = String, example = "PAT1")]
    pub patient_id: RecordKey,
    pub name: String,
    #[schema(value_type = u8, example = 35)]
    pub age: Age,
    pub gender: Gender,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub medical_history: Vec<MedicalRecord>,
    #[serde(default, deserialize_with = "unique_allergies")]
    allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

impl Patient {
    /// Creates a patient with empty allergy, medication and history lists.
    pub fn new(
        patient_id: RecordKey,
        name: impl Into<String>,
        age: Age,
        gender: Gender,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            patient_id,
            name: name.into(),
            age,
            gender,
            address: address.into(),
            phone: phone.into(),
            medical_history: Vec::new(),
            allergies: Vec::new(),
            medications: Vec::new(),
        }
    }

    /// Allergies in the order they were first recorded. Never contains duplicates.
    pub fn allergies(&self) -> &[String] {
        &self.allergies
    }

    /// Records an allergy. Returns `false` if it was already recorded.
    pub fn add_allergy(&mut self, allergy: impl Into<String>) -> bool {
        let allergy = allergy.into();
        if self.allergies.contains(&allergy) {
            return false;
        }
        self.allergies.push(allergy);
        true
    }

    pub fn remove_allergy(&mut self, allergy: &str) -> bool {
        let before = self.allergies.len();
        self.allergies.retain(|a| a != allergy);
        self.allergies.len() != before
    }

    pub fn add_medication(&mut self, medication: Medication) {
        self.medications.push(medication);
    }

    /// Removes every medication with the given name, returning how many were removed.
    pub fn remove_medication(&mut self, name: &str) -> usize {
        let before = self.medications.len();
        self.medications.retain(|m| m.name != name);
        before - self.medications.len()
    }

    pub fn add_medical_record(&mut self, record: MedicalRecord) {
        self.medical_history.push(record);
    }

    /// Diagnosis of the most recent history entry.
    pub fn latest_diagnosis(&self) -> &str {
        self.medical_history
            .last()
            .map(|r| r.diagnosis.as_str())
            .unwrap_or(NO_DIAGNOSIS)
    }
}

impl Entity for Patient {
    const COLLECTION: &'static str = PATIENTS_COLLECTION;
    const LABEL: &'static str = "Patient";
    const PLURAL: &'static str = "patients";

    fn key(&self) -> &RecordKey {
        &self.patient_id
    }
}

// Stored documents written by older clients may repeat an allergy.
fn unique_allergies<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut allergies = Vec::with_capacity(raw.len());
    for allergy in raw {
        if !allergies.contains(&allergy) {
            allergies.push(allergy);
        }
    }
    Ok(allergies)
}
