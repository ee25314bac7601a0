use crate::constants::BILLS_COLLECTION;
use crate::store::Entity;
use carehub_types::{Amount, RecordKey};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[schema(value_type = String, example = "BILL1")]
    pub bill_id: RecordKey,
    #[schema(value_type = String, example = "PAT1")]
    pub patient_id: RecordKey,
    #[schema(value_type = f64, example = 150.0)]
    pub amount: Amount,
    pub description: String,
    /// Set once by the pay action, never cleared.
    #[serde(default)]
    pub paid: bool,
}

impl Bill {
    /// Issues a new, unpaid bill.
    pub fn new(
        bill_id: RecordKey,
        patient_id: RecordKey,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            bill_id,
            patient_id,
            amount,
            description: description.into(),
            paid: false,
        }
    }
}

impl Entity for Bill {
    const COLLECTION: &'static str = BILLS_COLLECTION;
    const LABEL: &'static str = "Bill";
    const PLURAL: &'static str = "bills";

    fn key(&self) -> &RecordKey {
        &self.bill_id
    }
}
