//! Base implementation of records.
use crate::error::PlyError;
use chrono::prelude::{DateTime, Local};
use std::collections::HashMap;

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, like steps per second or a mean reward.
    Scalar(f64),

    /// A non-negative count, like a number of steps or episodes.
    Count(usize),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
///
/// # Examples
///
/// ```rust
/// use ply_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("mean_reward", 0.5);
/// record.insert("end_status", RecordValue::String("ABORTED".to_string()));
///
/// assert_eq!(record.get_scalar("mean_reward").unwrap(), 0.5);
/// assert!(record.get_count("mean_reward").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    ///
    /// # Arguments
    ///
    /// * `name` - The key for the scalar value
    /// * `value` - The scalar value to store
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets a scalar value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key does not exist
    /// - The value is not a scalar
    pub fn get_scalar(&self, k: &str) -> Result<f64, PlyError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(PlyError::RecordValueTypeError("Scalar".to_string())),
            None => Err(PlyError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a count from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key does not exist
    /// - The value is not a count
    pub fn get_count(&self, k: &str) -> Result<usize, PlyError> {
        match self.0.get(k) {
            Some(RecordValue::Count(v)) => Ok(*v),
            Some(_) => Err(PlyError::RecordValueTypeError("Count".to_string())),
            None => Err(PlyError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key does not exist
    /// - The value is not a string
    pub fn get_string(&self, k: &str) -> Result<String, PlyError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(PlyError::RecordValueTypeError("String".to_string())),
            None => Err(PlyError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
