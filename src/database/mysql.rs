//! MySQL execution collaborator backed by a sqlx pool

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Number, Value};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row as _, TypeInfo};

use crate::observability::{log_event_with_fields, Event};

use super::config::DatabaseConfig;
use super::errors::{DbError, DbResult};
use super::executor::{Param, Row, StatementExecutor};

/// Bootstrap DDL, run at connect time and before every statement
pub const CREATE_PATIENT_TABLE: &str = "CREATE TABLE IF NOT EXISTS patient (
    patientid INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(100),
    dateOfBirth DATE
) ENGINE=InnoDB";

/// Shared pool plus the lazy table bootstrap
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    /// Create the pool and make sure the `patient` table exists
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;

        let pool_size = config.pool_size.to_string();
        log_event_with_fields(
            Event::PoolCreated,
            &[("target", config.display_target().as_str()), ("pool_size", pool_size.as_str())],
        );

        let executor = Self::from_pool(pool);
        executor.ensure_table().await?;
        log_event_with_fields(Event::TableEnsured, &[("table", "patient")]);

        Ok(executor)
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn ensure_table(&self) -> DbResult<()> {
        sqlx::query(CREATE_PATIENT_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::Bootstrap(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl StatementExecutor for MySqlExecutor {
    async fn execute(&self, statement: &str, params: &[Param]) -> DbResult<Vec<Row>> {
        self.ensure_table().await?;

        let mut query = sqlx::query(statement);
        for param in params {
            query = match param {
                Param::Text(s) => query.bind(s.clone()),
                Param::Date(d) => query.bind(*d),
                Param::Int(i) => query.bind(*i),
                Param::Null => query.bind(None::<String>),
            };
        }

        let rows = query.fetch_all(&self.pool).await.map_err(describe_error)?;

        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn describe_error(e: sqlx::Error) -> DbError {
    match e.as_database_error() {
        Some(db_err) => DbError::Execution(match db_err.code() {
            Some(code) => format!("[{}] {}", code, db_err.message()),
            None => db_err.message().to_string(),
        }),
        None => DbError::Execution(e.to_string()),
    }
}

fn row_to_json(row: &MySqlRow) -> Row {
    let mut json_row = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let decoding = ColumnDecoding::for_type(column.type_info().name());
        json_row.insert(column.name().to_string(), decoding.decode(row, i));
    }
    json_row
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// How a column's value is read back, chosen from the MySQL type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnDecoding {
    Signed,
    Unsigned,
    Bool,
    Float,
    Double,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
    Bit,
    Json,
    /// Sent as text on the wire but not `String`-compatible in sqlx
    /// (DECIMAL, ENUM, SET)
    RawText,
    Other,
}

impl ColumnDecoding {
    fn for_type(type_name: &str) -> Self {
        match type_name {
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => Self::Signed,
            t if t.ends_with("UNSIGNED") => Self::Unsigned,
            "BOOLEAN" => Self::Bool,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            "YEAR" => Self::Year,
            "BIT" => Self::Bit,
            "JSON" => Self::Json,
            "DECIMAL" | "ENUM" | "SET" => Self::RawText,
            _ => Self::Other,
        }
    }

    fn decode(self, row: &MySqlRow, i: usize) -> Value {
        let value = match self {
            Self::Signed => row.try_get::<Option<i64>, _>(i).ok().flatten().map(Value::from),
            Self::Unsigned => row.try_get::<Option<u64>, _>(i).ok().flatten().map(Value::from),
            Self::Bool => row.try_get::<Option<bool>, _>(i).ok().flatten().map(Value::Bool),
            Self::Float => row
                .try_get::<Option<f32>, _>(i)
                .ok()
                .flatten()
                .map(|v| float_value(v as f64)),
            Self::Double => row.try_get::<Option<f64>, _>(i).ok().flatten().map(float_value),
            Self::Date => row
                .try_get::<Option<NaiveDate>, _>(i)
                .ok()
                .flatten()
                .map(|v| Value::String(v.format("%Y-%m-%d").to_string())),
            Self::Time => row
                .try_get::<Option<NaiveTime>, _>(i)
                .ok()
                .flatten()
                .map(|v| Value::String(v.format("%H:%M:%S").to_string())),
            Self::DateTime => row
                .try_get::<Option<NaiveDateTime>, _>(i)
                .ok()
                .flatten()
                .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string())),
            Self::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(i)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_rfc3339())),
            Self::Year => row
                .try_get_unchecked::<Option<u16>, _>(i)
                .ok()
                .flatten()
                .map(Value::from),
            Self::Bit => row
                .try_get_unchecked::<Option<Vec<u8>>, _>(i)
                .ok()
                .flatten()
                .map(|bytes| bit_value(&bytes)),
            Self::Json => row
                .try_get_unchecked::<Option<String>, _>(i)
                .ok()
                .flatten()
                .map(|text| json_value(&text)),
            Self::RawText => row
                .try_get_unchecked::<Option<String>, _>(i)
                .ok()
                .flatten()
                .map(Value::String),
            Self::Other => return fallback_value(row, i),
        };
        value.unwrap_or(Value::Null)
    }
}

/// BIT(n) arrives as big-endian bytes
fn bit_value(bytes: &[u8]) -> Value {
    if bytes.len() > 8 {
        return Value::String(String::from_utf8_lossy(bytes).into_owned());
    }
    Value::from(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

fn json_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn fallback_value(row: &MySqlRow, i: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<String>, _>(i) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(i) {
        return v.map(Value::from).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(i) {
        return v.map(float_value).unwrap_or(Value::Null);
    }
    if let Ok(Some(bytes)) = row.try_get::<Option<Vec<u8>>, _>(i) {
        return Value::String(String::from_utf8_lossy(&bytes).into_owned());
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_statement_shape() {
        let upper = CREATE_PATIENT_TABLE.to_uppercase();
        assert!(upper.starts_with("CREATE TABLE IF NOT EXISTS PATIENT"));
        assert!(upper.contains("PATIENTID INT AUTO_INCREMENT PRIMARY KEY"));
        assert!(upper.contains("DATEOFBIRTH DATE"));
    }

    #[test]
    fn test_float_value_rejects_nan() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(1.5), serde_json::json!(1.5));
    }

    #[test]
    fn test_decoding_by_type_name() {
        assert_eq!(ColumnDecoding::for_type("INT"), ColumnDecoding::Signed);
        assert_eq!(ColumnDecoding::for_type("BIGINT UNSIGNED"), ColumnDecoding::Unsigned);
        assert_eq!(ColumnDecoding::for_type("BOOLEAN"), ColumnDecoding::Bool);
        assert_eq!(ColumnDecoding::for_type("DATE"), ColumnDecoding::Date);
        assert_eq!(ColumnDecoding::for_type("VARCHAR"), ColumnDecoding::Other);
    }

    #[test]
    fn test_types_without_string_compat_have_own_decoding() {
        // SUM/AVG and literals like 1.5 come back as DECIMAL
        assert_eq!(ColumnDecoding::for_type("DECIMAL"), ColumnDecoding::RawText);
        assert_eq!(ColumnDecoding::for_type("ENUM"), ColumnDecoding::RawText);
        assert_eq!(ColumnDecoding::for_type("YEAR"), ColumnDecoding::Year);
        assert_eq!(ColumnDecoding::for_type("TIME"), ColumnDecoding::Time);
        assert_eq!(ColumnDecoding::for_type("JSON"), ColumnDecoding::Json);
        assert_eq!(ColumnDecoding::for_type("BIT"), ColumnDecoding::Bit);
    }

    #[test]
    fn test_bit_value() {
        assert_eq!(bit_value(&[0x01]), serde_json::json!(1));
        assert_eq!(bit_value(&[0x01, 0x00]), serde_json::json!(256));
        assert_eq!(bit_value(&[]), serde_json::json!(0));
    }

    #[test]
    fn test_json_value() {
        assert_eq!(json_value(r#"{"a":[1,2]}"#), serde_json::json!({"a": [1, 2]}));
        assert_eq!(json_value("not json"), serde_json::json!("not json"));
    }

    #[test]
    fn test_non_database_error_is_execution() {
        let err = describe_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Execution(_)));
    }
}
