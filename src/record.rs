use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SiftError;

/// One trending-video record, keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
    pub source_file: Arc<str>,
    pub line_number: usize,
}

impl Row {
    pub fn new(source_file: Arc<str>, line_number: usize) -> Self {
        Self {
            fields: HashMap::new(),
            source_file,
            line_number,
        }
    }

    /// Pair header names with values. Short records leave trailing columns absent.
    pub fn from_record<'a, H, V>(headers: H, values: V, source_file: Arc<str>, line_number: usize) -> Self
    where
        H: IntoIterator<Item = &'a str>,
        V: IntoIterator<Item = &'a str>,
    {
        let fields = headers
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            fields,
            source_file,
            line_number,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// A column the pipeline cannot do without.
    pub fn require(&self, name: &str) -> Result<&str, SiftError> {
        self.get(name).ok_or_else(|| SiftError::MissingField {
            field: name.to_string(),
            file: self.source_file.to_string(),
            row: self.line_number,
        })
    }

    /// Values in `fieldnames` order, empty for absent columns.
    pub fn project<'a>(&'a self, fieldnames: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        fieldnames.iter().map(move |name| self.get(name).unwrap_or(""))
    }
}
