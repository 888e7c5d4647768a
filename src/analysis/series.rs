//! Grouping records into plottable series.
//!
//! Groups keep the order in which their key first appears in the file,
//! and rows keep file order within each group.

use crate::error::AnalysisError;
use crate::models::{Point, Series, Table};
use std::collections::HashMap;

/// Rows sharing one value of the grouping column.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The grouping value as displayed (e.g. `3` for m=3).
    pub key: String,
    /// Row indices into the source table, in file order.
    pub rows: Vec<usize>,
}

/// Partition rows by `group_column`, or into a single group when `None`.
pub fn group_rows(table: &Table, group_column: Option<&str>) -> Result<Vec<Group>, AnalysisError> {
    let Some(column) = group_column else {
        return Ok(vec![Group {
            key: String::new(),
            rows: (0..table.len()).collect(),
        }]);
    };

    let idx = table.column_index(column)?;
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (row, record) in table.records.iter().enumerate() {
        let key = record
            .fields
            .get(idx)
            .map(|f| f.to_string())
            .unwrap_or_default();

        match positions.get(&key) {
            Some(&pos) => groups[pos].rows.push(row),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    rows: vec![row],
                });
            }
        }
    }

    Ok(groups)
}

/// One `(x_column, y_column)` series per group, labelled by the group key.
///
/// Without a grouping column the single series is labelled `y_column`.
pub fn build_series(
    table: &Table,
    group_column: Option<&str>,
    x_column: &str,
    y_column: &str,
) -> Result<Vec<Series>, AnalysisError> {
    let xs = table.numbers(x_column)?;
    let ys = table.numbers(y_column)?;

    let series = group_rows(table, group_column)?
        .into_iter()
        .map(|group| {
            let points = group.rows.iter().map(|&r| Point::new(xs[r], ys[r])).collect();
            let label = if group_column.is_some() {
                group.key
            } else {
                y_column.to_string()
            };
            Series::new(label, points)
        })
        .collect();

    Ok(series)
}

/// A single ungrouped `(x_column, y_column)` series.
pub fn xy_series(table: &Table, x_column: &str, y_column: &str) -> Result<Series, AnalysisError> {
    let xs = table.numbers(x_column)?;
    let ys = table.numbers(y_column)?;
    Series::from_xy(y_column, &xs, &ys)
}

/// `column` plotted against its row index (x = 0, 1, 2, ...).
pub fn column_series(table: &Table, column: &str) -> Result<Series, AnalysisError> {
    let points = table
        .numbers(column)?
        .into_iter()
        .enumerate()
        .map(|(i, y)| Point::new(i as f64, y))
        .collect();
    Ok(Series::new(column, points))
}

/// One series per group across several value columns.
///
/// x is the position of each column in `value_columns`; y is taken from the
/// first row of the group.
pub fn profile_series(
    table: &Table,
    group_column: &str,
    value_columns: &[&str],
) -> Result<Vec<Series>, AnalysisError> {
    table.require_columns(value_columns)?;

    group_rows(table, Some(group_column))?
        .into_iter()
        .map(|group| {
            let row = group.rows[0];
            let points = value_columns
                .iter()
                .enumerate()
                .map(|(i, column)| Ok(Point::new(i as f64, table.number_at(row, column)?)))
                .collect::<Result<Vec<_>, AnalysisError>>()?;
            Ok(Series::new(group.key, points))
        })
        .collect()
}
