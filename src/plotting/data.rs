//! Column access and grouping on polars dataframes.
//!
//! Builders never validate column names themselves: lookups go straight to
//! polars and its errors are propagated as [`PlotError::Data`](crate::PlotError::Data).

use indexmap::{IndexMap, IndexSet};
use polars::prelude::{DataFrame, DataType};

use crate::PlotResult;

/// One column name, or several columns drawn as separate traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// A single column.
    Single(String),
    /// Several columns, one trace per column.
    Many(Vec<String>),
}

impl ColumnSelector {
    /// Selected column names, in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            ColumnSelector::Single(name) => vec![name.as_str()],
            ColumnSelector::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Whether more than one column was selected.
    pub fn is_many(&self) -> bool {
        matches!(self, ColumnSelector::Many(names) if names.len() > 1)
    }

    /// Axis title for the selected columns: the column name itself, or
    /// `fallback` when several columns share the axis.
    pub fn axis_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ColumnSelector::Single(name) => name,
            ColumnSelector::Many(names) if names.len() == 1 => &names[0],
            ColumnSelector::Many(_) => fallback,
        }
    }
}

impl From<&str> for ColumnSelector {
    fn from(name: &str) -> Self {
        ColumnSelector::Single(name.to_string())
    }
}

impl From<String> for ColumnSelector {
    fn from(name: String) -> Self {
        ColumnSelector::Single(name)
    }
}

impl From<&String> for ColumnSelector {
    fn from(name: &String) -> Self {
        ColumnSelector::Single(name.clone())
    }
}

impl From<Vec<&str>> for ColumnSelector {
    fn from(names: Vec<&str>) -> Self {
        ColumnSelector::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ColumnSelector {
    fn from(names: Vec<String>) -> Self {
        ColumnSelector::Many(names)
    }
}

impl From<&[&str]> for ColumnSelector {
    fn from(names: &[&str]) -> Self {
        ColumnSelector::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnSelector {
    fn from(names: [&str; N]) -> Self {
        ColumnSelector::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

/// Reads a column as `f64`, mapping nulls to NaN.
pub fn float_column(df: &DataFrame, name: &str) -> PlotResult<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Reads a column as display labels, one per row.
pub fn label_column(df: &DataFrame, name: &str) -> PlotResult<Vec<String>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or("null").to_string())
        .collect())
}

/// Whether a column holds floating point values.
pub fn is_float_column(df: &DataFrame, name: &str) -> PlotResult<bool> {
    Ok(df.column(name)?.dtype().is_float())
}

/// Distinct values of a column in order of first appearance, plus the group
/// code of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups {
    column: Option<String>,
    labels: IndexSet<String>,
    codes: Vec<usize>,
}

impl Groups {
    /// Groups the rows of `df` by the values of column `name`.
    pub fn from_column(df: &DataFrame, name: &str) -> PlotResult<Self> {
        let mut labels = IndexSet::new();
        let codes = label_column(df, name)?
            .into_iter()
            .map(|label| labels.insert_full(label).0)
            .collect();
        Ok(Self {
            column: Some(name.to_string()),
            labels,
            codes,
        })
    }

    /// Groups by `name` when given, otherwise puts every row in one group.
    pub fn optional(df: &DataFrame, name: Option<&str>) -> PlotResult<Self> {
        match name {
            Some(name) => Self::from_column(df, name),
            None => Ok(Self::single(df.height())),
        }
    }

    /// A single unnamed group holding `rows` rows.
    pub fn single(rows: usize) -> Self {
        Self {
            column: None,
            labels: IndexSet::from([String::new()]),
            codes: vec![0; rows],
        }
    }

    /// Grouping column, if any.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no groups (only for an empty, named column).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of group `code`.
    pub fn label(&self, code: usize) -> &str {
        self.labels.get_index(code).map_or("", String::as_str)
    }

    /// Group code of each row.
    pub fn codes(&self) -> &[usize] {
        &self.codes
    }

    /// `column=value` caption for group `code`, as shown on facet panels.
    pub fn caption(&self, code: usize) -> String {
        match &self.column {
            Some(column) => format!("{column}={}", self.label(code)),
            None => String::new(),
        }
    }
}

/// Splits row indices by the combined codes of several groupings.
///
/// Keys appear in order of first appearance, so traces come out in the order
/// their data first shows up in the frame.
pub fn partition<const N: usize>(groupings: [&Groups; N], rows: usize) -> IndexMap<[usize; N], Vec<usize>> {
    let mut parts: IndexMap<[usize; N], Vec<usize>> = IndexMap::new();
    for row in 0..rows {
        let key = groupings.map(|g| g.codes()[row]);
        parts.entry(key).or_default().push(row);
    }
    parts
}

/// Picks the values at `rows`.
pub fn take<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().map(|&r| values[r].clone()).collect()
}

/// Largest marker diameter in pixels for size-mapped columns.
pub const MAX_MARKER_SIZE: f64 = 20.0;

/// Maps a size column to marker diameters.
///
/// Marker area is proportional to the value relative to the column maximum.
/// Non-positive and NaN values get a zero-size marker.
pub fn marker_sizes(values: &[f64]) -> Vec<usize> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(0.0_f64, f64::max);
    values
        .iter()
        .map(|&v| {
            if max > 0.0 && v > 0.0 && v.is_finite() {
                (MAX_MARKER_SIZE * (v / max).sqrt()).round() as usize
            } else {
                0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn frame() -> DataFrame {
        df!(
            "x" => [1.0, 2.0, 3.0, 4.0],
            "k" => [3i32, 1, 3, 2],
            "s" => ["b", "a", "b", "a"]
        )
        .expect("valid frame")
    }

    #[test]
    fn test_selector_from_variants() {
        assert_eq!(ColumnSelector::from("y").names(), vec!["y"]);
        assert!(!ColumnSelector::from("y").is_many());

        let many = ColumnSelector::from(["y1", "y2"]);
        assert_eq!(many.names(), vec!["y1", "y2"]);
        assert!(many.is_many());
        assert_eq!(many.axis_title("value"), "value");
        assert_eq!(ColumnSelector::from(vec!["y1"]).axis_title("value"), "y1");
    }

    #[test]
    fn test_float_column_casts_integers() {
        let values = float_column(&frame(), "k").expect("numeric column");
        assert_eq!(values, vec![3.0, 1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_missing_column_is_data_error() {
        let result = float_column(&frame(), "nope");
        assert!(matches!(result, Err(crate::PlotError::Data(_))));
    }

    #[test]
    fn test_groups_first_appearance_order() {
        let groups = Groups::from_column(&frame(), "k").expect("groups");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.label(0), "3");
        assert_eq!(groups.label(1), "1");
        assert_eq!(groups.label(2), "2");
        assert_eq!(groups.codes(), &[0, 1, 0, 2]);
        assert_eq!(groups.caption(1), "k=1");
    }

    #[test]
    fn test_single_group() {
        let groups = Groups::optional(&frame(), None).expect("groups");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.codes(), &[0, 0, 0, 0]);
        assert_eq!(groups.caption(0), "");
        assert!(groups.column().is_none());
    }

    #[test]
    fn test_partition_cross_product() {
        let df = frame();
        let k = Groups::from_column(&df, "k").expect("groups");
        let s = Groups::from_column(&df, "s").expect("groups");
        let parts = partition([&k, &s], df.height());

        let keys: Vec<_> = parts.keys().copied().collect();
        assert_eq!(keys, vec![[0, 0], [1, 1], [2, 1]]);
        assert_eq!(parts[&[0usize, 0]], vec![0, 2]);
    }

    #[test]
    fn test_marker_sizes_scale_by_area() {
        let sizes = marker_sizes(&[4.0, 1.0, 0.0, -2.0, f64::NAN]);
        assert_eq!(sizes, vec![20, 10, 0, 0, 0]);
        assert_eq!(marker_sizes(&[-1.0, -3.0]), vec![0, 0]);
    }

    #[test]
    fn test_take() {
        assert_eq!(take(&[10, 20, 30], &[2, 0]), vec![30, 10]);
    }
}
