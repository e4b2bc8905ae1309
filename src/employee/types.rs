use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized employee record consumed by the poster engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub name: String,
    pub designation: String,
    pub vertical: String,
    pub department: String,
    pub location: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_joining: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

impl EmployeeRecord {
    /// Photo URL, if one is set and non-blank.
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Names of the upstream fields that feed each record attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub name: String,
    pub designation: String,
    pub vertical: String,
    pub department: String,
    pub location: String,
    pub dob: String,
    pub doj: String,
    pub photo_url: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            name: "EmployeeName".to_string(),
            designation: "Designation".to_string(),
            vertical: "Vertical".to_string(),
            department: "Department".to_string(),
            location: "Location".to_string(),
            dob: "DateOfBirth".to_string(),
            doj: "DateOfJoining".to_string(),
            photo_url: "EmployeeImage".to_string(),
        }
    }
}
