use crate::constants::DOCTORS_COLLECTION;
use crate::store::Entity;
use carehub_types::RecordKey;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[schema(value_type = String, example = "DOC1")]
    pub doctor_id: RecordKey,
    pub name: String,
    pub specialization: String,
    /// Free-text working hours, e.g. `9AM-5PM`.
    pub availability: String,
}

impl Doctor {
    pub fn new(
        doctor_id: RecordKey,
        name: impl Into<String>,
        specialization: impl Into<String>,
        availability: impl Into<String>,
    ) -> Self {
        Self {
            doctor_id,
            name: name.into(),
            specialization: specialization.into(),
            availability: availability.into(),
        }
    }
}

impl Entity for Doctor {
    const COLLECTION: &'static str = DOCTORS_COLLECTION;
    const LABEL: &'static str = "Doctor";
    const PLURAL: &'static str = "doctors";

    fn key(&self) -> &RecordKey {
        &self.doctor_id
    }
}
