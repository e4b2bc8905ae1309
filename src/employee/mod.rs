// Employee records - upstream fetching and normalization
mod error;
mod mapping;
mod sources;
mod types;

pub use error::EmployeeError;
pub use mapping::{map_employee, parse_date};
pub use sources::{
    DynEmployeeSource, EmployeeSource, FETCH_TIMEOUT, SampleJsonSource, ZingHrSource,
    records_from_json,
};
pub use types::{EmployeeRecord, FieldMapping};
