use super::{Collection, DocumentStore, Ping, Repository};
use crate::model::{Appointment, Bill, Doctor, Patient, User};
use std::sync::Arc;

/// The five entity repositories plus the store they share.
///
/// Built once at startup and cloned into every dispatcher. The fields are trait objects so
/// tests can swap in failing or instrumented repositories.
#[derive(Clone)]
pub struct Repositories {
    pub store: Arc<dyn Ping>,
    pub patients: Arc<dyn Repository<Patient>>,
    pub doctors: Arc<dyn Repository<Doctor>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub bills: Arc<dyn Repository<Bill>>,
    pub users: Arc<dyn Repository<User>>,
}

impl Repositories {
    pub fn open(store: Arc<DocumentStore>) -> Self {
        Self {
            patients: Arc::new(Collection::<Patient>::new(store.clone())),
            doctors: Arc::new(Collection::<Doctor>::new(store.clone())),
            appointments: Arc::new(Collection::<Appointment>::new(store.clone())),
            bills: Arc::new(Collection::<Bill>::new(store.clone())),
            users: Arc::new(Collection::<User>::new(store.clone())),
            store,
        }
    }

    /// Fresh repositories over a new in-memory store.
    pub fn in_memory() -> Self {
        Self::open(Arc::new(DocumentStore::in_memory()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_types::RecordKey;

    #[test]
    fn test_repositories_share_one_store() {
        let store = Arc::new(DocumentStore::in_memory());
        let repos = Repositories::open(store.clone());
        assert!(repos.store.ping());

        store.close();
        assert!(!repos.store.ping());
        assert!(repos.doctors.find_all().is_err());
    }

    #[test]
    fn test_clones_see_the_same_records() {
        let repos = Repositories::in_memory();
        let clone = repos.clone();

        let doctor = Doctor::new(
            RecordKey::new("DOC1").unwrap(),
            "Dr. Smith",
            "Cardiology",
            "9AM-5PM",
        );
        assert!(repos.doctors.insert(doctor.clone()).unwrap());
        assert_eq!(clone.doctors.find("DOC1").unwrap(), Some(doctor));
    }
}
