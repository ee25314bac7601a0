//! Appointments between a patient and a doctor.
//!
//! The patient and doctor ids are plain references; nothing checks that either record
//! exists. The display names are copied in when the appointment is booked and are not kept in
//! sync afterwards, so they can go stale if a patient or doctor is renamed.

use crate::constants::APPOINTMENTS_COLLECTION;
use crate::store::Entity;
use carehub_types::RecordKey;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[schema(value_type = String, example = "APP1")]
    pub appointment_id: RecordKey,
    #[schema(value_type = String, example = "PAT1")]
    pub patient_id: RecordKey,
    #[schema(value_type = String, example = "DOC1")]
    pub doctor_id: RecordKey,
    pub date: String,
    pub time: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    /// Set once by the complete action, never cleared.
    #[serde(default)]
    pub completed: bool,
}

impl Appointment {
    /// Books a new, not yet completed appointment without cached display names.
    pub fn new(
        appointment_id: RecordKey,
        patient_id: RecordKey,
        doctor_id: RecordKey,
        date: impl Into<String>,
        time: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            appointment_id,
            patient_id,
            doctor_id,
            date: date.into(),
            time: time.into(),
            description: description.into(),
            patient_name: None,
            doctor_name: None,
            completed: false,
        }
    }
}

impl Entity for Appointment {
    const COLLECTION: &'static str = APPOINTMENTS_COLLECTION;
    const LABEL: &'static str = "Appointment";
    const PLURAL: &'static str = "appointments";

    fn key(&self) -> &RecordKey {
        &self.appointment_id
    }
}
