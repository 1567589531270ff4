//! Patient records and the batch insert payload

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::errors::{DbError, DbResult};
use super::executor::Param;

/// Parameterized insert used for every batch entry
pub const INSERT_PATIENT: &str = "INSERT INTO patient (name, dateOfBirth) VALUES (?, ?)";

/// One batch entry, reduced to the two values bound into [`INSERT_PATIENT`].
///
/// Entries are not schema-checked. Whatever the client sent for
/// `patientName` and `birthDate` goes to the database, which decides
/// whether it fits the column. The numeric `patientid` is assigned by
/// storage and never part of the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub name: Param,
    pub date_of_birth: Param,
}

impl PatientRecord {
    /// Read one element of the `patients` array.
    ///
    /// `null` binds as NULL and a `YYYY-MM-DD` string as a date; other
    /// scalars bind as-is. A field that is absent has nothing to bind and
    /// fails the entry.
    pub fn from_entry(entry: &Value) -> DbResult<Self> {
        Ok(Self {
            name: scalar_param(field(entry, "patientName")?),
            date_of_birth: date_param(field(entry, "birthDate")?),
        })
    }

    /// Parameters for [`INSERT_PATIENT`], in placeholder order
    pub fn insert_params(&self) -> Vec<Param> {
        vec![self.name.clone(), self.date_of_birth.clone()]
    }
}

/// Body of `POST /api/insert-multiple`
#[derive(Debug, Clone, Deserialize)]
pub struct PatientBatch {
    pub patients: Vec<Value>,
}

fn field<'a>(entry: &'a Value, name: &str) -> DbResult<&'a Value> {
    entry
        .get(name)
        .ok_or_else(|| DbError::Bind(format!("{} is undefined", name)))
}

fn scalar_param(value: &Value) -> Param {
    match value {
        Value::Null => Param::Null,
        Value::String(s) => Param::Text(s.clone()),
        Value::Bool(b) => Param::Int(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Param::Int(i),
            None => Param::Text(n.to_string()),
        },
        // Arrays and objects go over as their JSON text.
        other => Param::Text(other.to_string()),
    }
}

fn date_param(value: &Value) -> Param {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Param::Date)
            .unwrap_or_else(|_| Param::Text(s.clone())),
        other => scalar_param(other),
    }
}
