use chrono::NaiveDate;
use serde_json::Value;

use super::{EmployeeRecord, FieldMapping};

const DATE_FORMATS: [&str; 3] = ["%d-%m-%Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Parse a date in any of the accepted formats; `None` when empty or unparseable.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Normalize one raw upstream record using the configured field names.
pub fn map_employee(raw: &Value, mapping: &FieldMapping) -> EmployeeRecord {
    let field = |key: &str| string_field(raw, key);
    let photo_url = field(&mapping.photo_url);

    EmployeeRecord {
        name: field(&mapping.name),
        designation: field(&mapping.designation),
        vertical: field(&mapping.vertical),
        department: field(&mapping.department),
        location: field(&mapping.location),
        date_of_birth: parse_date(&field(&mapping.dob)),
        date_of_joining: parse_date(&field(&mapping.doj)),
        photo_url: (!photo_url.trim().is_empty()).then_some(photo_url),
    }
}

// Strings are taken as-is, other scalars are stringified, null and missing are empty.
fn string_field(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 3, 15);
        assert_eq!(parse_date("15-03-1990"), expected);
        assert_eq!(parse_date("1990-03-15"), expected);
        assert_eq!(parse_date("15/03/1990"), expected);
        assert_eq!(parse_date("  15-03-1990 "), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("March 15"), None);
        assert_eq!(parse_date("31-02-2020"), None);
    }

    #[test]
    fn test_map_employee_with_default_mapping() {
        let raw = json!({
            "EmployeeName": "john doe",
            "Designation": "Engineer",
            "Vertical": "Sales",
            "Department": "Finance",
            "Location": "Pune",
            "DateOfBirth": "15-03-1990",
            "DateOfJoining": "01-06-2015",
            "EmployeeImage": "https://example.com/john.jpg"
        });

        let employee = map_employee(&raw, &FieldMapping::default());
        assert_eq!(employee.name, "john doe");
        assert_eq!(employee.designation, "Engineer");
        assert_eq!(employee.vertical, "Sales");
        assert_eq!(employee.department, "Finance");
        assert_eq!(employee.location, "Pune");
        assert_eq!(employee.date_of_birth, NaiveDate::from_ymd_opt(1990, 3, 15));
        assert_eq!(employee.date_of_joining, NaiveDate::from_ymd_opt(2015, 6, 1));
        assert_eq!(employee.photo_url(), Some("https://example.com/john.jpg"));
    }

    #[test]
    fn test_map_employee_missing_and_odd_fields() {
        let raw = json!({
            "EmployeeName": null,
            "Designation": 42,
            "DateOfBirth": "not a date",
            "EmployeeImage": ""
        });

        let employee = map_employee(&raw, &FieldMapping::default());
        assert_eq!(employee.name, "");
        assert_eq!(employee.designation, "42");
        assert_eq!(employee.location, "");
        assert_eq!(employee.date_of_birth, None);
        assert_eq!(employee.date_of_joining, None);
        assert_eq!(employee.photo_url, None);
    }

    #[test]
    fn test_map_employee_custom_mapping() {
        let raw = json!({ "full_name": "Asha Rao", "dob": "1988-12-01" });
        let mapping = FieldMapping {
            name: "full_name".to_string(),
            dob: "dob".to_string(),
            ..FieldMapping::default()
        };

        let employee = map_employee(&raw, &mapping);
        assert_eq!(employee.name, "Asha Rao");
        assert_eq!(employee.date_of_birth, NaiveDate::from_ymd_opt(1988, 12, 1));
    }
}
