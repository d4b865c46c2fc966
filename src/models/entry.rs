use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CategoryId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub category_id: CategoryId,
    pub date: DateTime<Utc>,
    pub value: Decimal,
    #[serde(default)]
    pub note: String,
}

impl Entry {
    pub fn new(category_id: CategoryId, value: Decimal, note: String, date: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category_id,
            date,
            value,
            note,
        }
    }
}
