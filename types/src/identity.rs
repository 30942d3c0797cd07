//! The caller-supplied identity profile the oracle compares against.

use serde::{Deserialize, Serialize};

/// Identity the user claims to be.
///
/// The pipeline treats this as an opaque parameter: it is passed through to
/// the oracle with each submission and never compared locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedIdentity {
    pub full_name: String,
    /// Date of birth as the caller stores it (typically `YYYY-MM-DD`).
    pub date_of_birth: String,
    pub id_number: String,
    pub gender: String,
}

impl ExpectedIdentity {
    pub fn new(
        full_name: impl Into<String>,
        date_of_birth: impl Into<String>,
        id_number: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            date_of_birth: date_of_birth.into(),
            id_number: id_number.into(),
            gender: gender.into(),
        }
    }
}
