use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// A single row from a query result.
///
/// Column names are shared across all rows of a result set; each row carries
/// only its values plus an index map for name lookups.
#[derive(Debug, Clone)]
pub struct Row {
    /// The column names for this row (shared across the result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<SqlValue>,
    column_index: Arc<HashMap<String, usize>>,
}

impl Row {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let column_index = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        Self {
            column_names,
            values,
            column_index,
        }
    }

    /// Get the index of a column by name.
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index.get(column_name) {
            return Some(idx);
        }
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&SqlValue> {
        self.column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }
}

/// The materialized output of one query execution.
///
/// An empty `results` vector inside a successful return means the query ran
/// and matched no rows; failures are always reported as errors, never as an
/// empty or missing result set.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Row>,
    /// The number of rows returned or affected
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known row capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names shared by every row of this result set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        let index = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        self.column_names = Some(column_names);
        self.column_index = Some(index);
    }

    /// Get the column names for this result set.
    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// True when the query ran but matched no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Append a row built from the shared column header.
    ///
    /// Rows added before `set_column_names` are dropped; backends always set
    /// the header first.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        if let (Some(column_names), Some(column_index)) =
            (&self.column_names, &self.column_index)
        {
            self.results.push(Row {
                column_names: Arc::clone(column_names),
                values,
                column_index: Arc::clone(column_index),
            });
            self.rows_affected += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_one_header() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["id".to_string(), "name".to_string()]));
        rs.add_row_values(vec![SqlValue::Int(1), SqlValue::Text("a".into())]);
        rs.add_row_values(vec![SqlValue::Int(2), SqlValue::Text("b".into())]);

        assert_eq!(rs.rows_affected, 2);
        assert!(Arc::ptr_eq(
            &rs.results[0].column_names,
            &rs.results[1].column_names
        ));
        assert_eq!(rs.results[1].get("name").unwrap().as_text(), Some("b"));
        assert_eq!(rs.results[0].get_by_index(0).unwrap().as_int(), Some(&1));
        assert!(rs.results[0].get("missing").is_none());
    }

    #[test]
    fn empty_result_set_reads_as_no_rows() {
        let mut rs = ResultSet::with_capacity(0);
        rs.set_column_names(Arc::new(vec!["id".to_string()]));
        assert!(rs.is_empty());
        assert_eq!(rs.rows_affected, 0);
    }
}
