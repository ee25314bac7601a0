//! Constants used throughout the CareHub core crate.
//!
//! Collection names match the document-store collections the records have always lived in, so
//! an on-disk data directory stays readable across versions.

/// Collection holding patient documents.
pub const PATIENTS_COLLECTION: &str = "patients";

/// Collection holding doctor documents.
pub const DOCTORS_COLLECTION: &str = "doctors";

/// Collection holding appointment documents.
pub const APPOINTMENTS_COLLECTION: &str = "appointments";

/// Collection holding bill documents.
pub const BILLS_COLLECTION: &str = "bills";

/// Collection holding user accounts.
pub const USERS_COLLECTION: &str = "users";

/// File extension for on-disk collection documents.
pub const COLLECTION_FILE_EXTENSION: &str = "json";

/// Text returned by [`crate::model::Patient::latest_diagnosis`] for an empty history.
pub const NO_DIAGNOSIS: &str = "No diagnosis recorded";
