//! Result grid presentation.

use common::models::TabularValue;
use serde_json::Value;

pub const ROW_HEIGHT: u32 = 36;
pub const HEADER_PADDING: u32 = 35;
pub const MAX_HEIGHT: u32 = 362;

/// Pixel height of the result viewport for `row_count` rows.
pub fn height_for(row_count: usize) -> u32 {
    let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
    rows.saturating_mul(ROW_HEIGHT)
        .saturating_add(HEADER_PADDING)
        .min(MAX_HEIGHT)
}

/// Result grid ready for the template.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGrid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub height: u32,
}

impl From<&TabularValue> for ResultGrid {
    fn from(table: &TabularValue) -> Self {
        Self {
            columns: table.columns.clone(),
            rows: table
                .rows
                .iter()
                .map(|row| row.iter().map(display_cell).collect())
                .collect(),
            height: height_for(table.row_count()),
        }
    }
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_height_for_empty_table() {
        assert_eq!(height_for(0), 35);
    }

    #[test]
    fn test_height_is_monotonic_and_capped() {
        let heights: Vec<u32> = (0..50).map(height_for).collect();
        assert!(heights.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(height_for(9), 359);
        assert_eq!(height_for(10), MAX_HEIGHT);
        assert_eq!(height_for(usize::MAX), MAX_HEIGHT);
    }

    #[test]
    fn test_grid_formats_cells() {
        let table = TabularValue::new(
            vec!["id".into(), "name".into(), "price".into()],
            vec![vec![json!(1), json!("apple"), Value::Null]],
        );
        let grid = ResultGrid::from(&table);
        assert_eq!(grid.rows, vec![vec!["1", "apple", "NULL"]]);
        assert_eq!(grid.height, 71);
    }
}
