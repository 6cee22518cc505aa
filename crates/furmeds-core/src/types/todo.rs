use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Generated reminder for a due dose or meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToDo {
    #[serde(rename = "uuid")]
    pub id: RecordId,
    #[serde(default)]
    pub user_uid: String,
    #[serde(rename = "petUuid")]
    pub pet_id: RecordId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    pub delete_after: DateTime<Utc>,
}
