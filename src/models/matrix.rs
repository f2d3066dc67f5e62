use std::collections::HashMap;
use std::hash::Hash;

/// Immutable 2D numeric table with named row and column keys.
///
/// Backs the cluster × species frequency table and the cluster ×
/// cluster similarity table. Values are stored row-major; key lookups
/// resolve through hashed indices, so `get`/`row` are O(1). Rows and
/// columns keep the order they were built with, which the loader fixes
/// to ascending key order so downstream iteration is deterministic.
#[derive(Debug, Clone)]
pub struct KeyedMatrix<R, C> {
    row_keys: Vec<R>,
    col_keys: Vec<C>,
    row_index: HashMap<R, usize>,
    col_index: HashMap<C, usize>,
    values: Vec<f64>,
}

impl<R, C> KeyedMatrix<R, C>
where
    R: Eq + Hash + Clone + std::fmt::Display,
    C: Eq + Hash + Clone + std::fmt::Display,
{
    /// Builds a matrix from column keys and `(row_key, row_values)`
    /// pairs, in the given order.
    ///
    /// Fails on duplicate keys or a row whose width differs from the
    /// column count; the message is meant to be wrapped into a
    /// malformed-artifact error by the caller.
    pub fn from_rows(col_keys: Vec<C>, rows: Vec<(R, Vec<f64>)>) -> Result<Self, String> {
        let mut col_index = HashMap::with_capacity(col_keys.len());
        for (i, key) in col_keys.iter().enumerate() {
            if col_index.insert(key.clone(), i).is_some() {
                return Err(format!("duplicate column key {}", key));
            }
        }

        let mut row_keys = Vec::with_capacity(rows.len());
        let mut row_index = HashMap::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len() * col_keys.len());

        for (key, row) in rows {
            if row.len() != col_keys.len() {
                return Err(format!(
                    "row {} has {} columns, expected {}",
                    key,
                    row.len(),
                    col_keys.len()
                ));
            }
            if row_index.insert(key.clone(), row_keys.len()).is_some() {
                return Err(format!("duplicate row key {}", key));
            }
            row_keys.push(key);
            values.extend(row);
        }

        Ok(Self {
            row_keys,
            col_keys,
            row_index,
            col_index,
            values,
        })
    }

    /// Value at (row, col), `None` when either key is absent.
    pub fn get(&self, row: &R, col: &C) -> Option<f64> {
        let r = *self.row_index.get(row)?;
        let c = *self.col_index.get(col)?;
        Some(self.values[r * self.col_keys.len() + c])
    }

    /// Full row slice for a key, `None` when the key is absent.
    pub fn row(&self, key: &R) -> Option<&[f64]> {
        let r = *self.row_index.get(key)?;
        let width = self.col_keys.len();
        Some(&self.values[r * width..(r + 1) * width])
    }

    pub fn contains_row(&self, key: &R) -> bool {
        self.row_index.contains_key(key)
    }

    /// Row keys in build order.
    pub fn row_keys(&self) -> &[R] {
        &self.row_keys
    }

    /// Column keys in build order.
    pub fn col_keys(&self) -> &[C] {
        &self.col_keys
    }

    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }
}
