use serde::{Deserialize, Serialize};

/// Placeholder for absent spreadsheet cells and webhook fields.
pub const MISSING: &str = "N/A";

/// One row of an uploaded contact spreadsheet. `phone` is stored as read, not normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    pub phone: String,
    pub name: String,
    pub company: String,
}

impl ContactRow {
    pub fn new(
        phone: impl Into<String>,
        name: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            phone: phone.into(),
            name: name.into(),
            company: company.into(),
        }
    }
}
