//! Class index → label mapping.
//!
//! The table is fixed at startup and must line up with the model's output
//! classes. Lookups are bounds-checked; an index the table does not know is
//! reported as `None` so callers can surface it as a model/table mismatch.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Class names of the reference iris deployment, in model output order.
pub const IRIS_LABELS: [&str; 3] = ["setosa", "versicolor", "virginica"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelTableError {
    #[error("label table is empty")]
    Empty,
    #[error("label at position {0} is blank")]
    Blank(usize),
    #[error("duplicate label {0:?}")]
    Duplicate(String),
}

/// Ordered, closed set of class labels. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Arc<[String]>,
}

impl LabelTable {
    /// Build a table from labels in class-index order.
    pub fn new(labels: Vec<String>) -> Result<Self, LabelTableError> {
        if labels.is_empty() {
            return Err(LabelTableError::Empty);
        }
        let mut seen = HashSet::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(LabelTableError::Blank(i));
            }
            if !seen.insert(label.as_str()) {
                return Err(LabelTableError::Duplicate(label.clone()));
            }
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    /// The reference table: setosa, versicolor, virginica.
    pub fn iris() -> Self {
        Self {
            labels: IRIS_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Label for a model class index, or `None` if out of range.
    pub fn label(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::iris()
    }
}

impl fmt::Display for LabelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels.join(","))
    }
}

/// Parses a comma-separated list, e.g. `setosa,versicolor,virginica`.
impl FromStr for LabelTable {
    type Err = LabelTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(LabelTableError::Empty);
        }
        Self::new(s.split(',').map(|l| l.trim().to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iris_table_maps_in_order() {
        let table = LabelTable::iris();
        assert_eq!(table.len(), 3);
        assert_eq!(table.label(0), Some("setosa"));
        assert_eq!(table.label(1), Some("versicolor"));
        assert_eq!(table.label(2), Some("virginica"));
    }

    #[test]
    fn out_of_range_indices_are_none() {
        let table = LabelTable::iris();
        assert_eq!(table.label(3), None);
        assert_eq!(table.label(-1), None);
        assert_eq!(table.label(i64::MAX), None);
    }

    #[test]
    fn parses_comma_separated() {
        let table: LabelTable = "setosa, versicolor ,virginica".parse().unwrap();
        assert_eq!(table, LabelTable::iris());
        assert_eq!(table.to_string(), "setosa,versicolor,virginica");
    }

    #[test]
    fn rejects_empty_and_blank() {
        assert_eq!("".parse::<LabelTable>(), Err(LabelTableError::Empty));
        assert_eq!(LabelTable::new(vec![]), Err(LabelTableError::Empty));
        assert_eq!(
            "a,,b".parse::<LabelTable>(),
            Err(LabelTableError::Blank(1))
        );
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            "a,b,a".parse::<LabelTable>(),
            Err(LabelTableError::Duplicate("a".into()))
        );
    }

    #[test]
    fn contains_checks_membership() {
        let table = LabelTable::iris();
        assert!(table.contains("virginica"));
        assert!(!table.contains("rose"));
        assert_eq!(table.iter().collect::<Vec<_>>(), IRIS_LABELS);
    }
}
