use serde::{Deserialize, Serialize};

use super::RecordId;

/// Scheduled visit to the vet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetAppointment {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    pub name: String,
}

impl VetAppointment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
        }
    }
}
