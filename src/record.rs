//! Fixed-schema records
//!
//! Every page template declares a closed, versioned list of field names.
//! A [`Record`] always carries exactly that field set: a field that was not
//! extracted is an empty string, never an absent key, so every row written
//! to a table has the same columns in the same order.

use std::fmt;

/// A named, versioned, closed field list for one page template
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    /// Template name (used in error messages and logs)
    pub name: &'static str,

    /// Bumped whenever the field list or its order changes
    pub version: u32,

    /// Column names, in output order
    pub fields: &'static [&'static str],
}

impl Schema {
    /// Creates an empty record of this schema (all fields empty strings)
    pub fn record(&'static self) -> Record {
        Record {
            schema: self,
            values: vec![String::new(); self.fields.len()],
        }
    }

    /// Returns the index of a field name, if it belongs to this schema
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// Returns true if the field name belongs to this schema
    pub fn contains(&self, field: &str) -> bool {
        self.field_index(field).is_some()
    }
}

/// One flat, fixed-schema row of extracted data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<String>,
}

impl Record {
    /// Returns the schema this record belongs to
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Sets a field value; a name outside the schema's closed set is ignored
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        if let Some(index) = self.schema.field_index(field) {
            self.values[index] = value.into();
        }
    }

    /// Returns the value of a field, or "" for a name outside the schema
    pub fn get(&self, field: &str) -> &str {
        self.schema
            .field_index(field)
            .map(|index| self.values[index].as_str())
            .unwrap_or("")
    }

    /// Returns all values in schema field order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Applies a transform to one field in place
    pub fn map_field(&mut self, field: &str, f: impl FnOnce(&str) -> String) {
        if let Some(index) = self.schema.field_index(field) {
            self.values[index] = f(&self.values[index]);
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} record", self.schema.name)
    }
}
