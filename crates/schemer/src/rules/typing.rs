//! Statistical type inference over string columns.

use crate::data::{Column, ColumnType};

/// Infer the type of a string column.
///
/// Counts cells parseable as integer and as double out of n. Integers
/// win when they clear the threshold and at least tie the double count
/// (every integer also parses as a double); doubles win when they clear
/// the threshold alone; anything else stays a string whose max length is
/// the longest observed value.
pub(crate) fn infer_column_type(column: &Column<String>, threshold: f64) -> ColumnType {
    let n = column.len();
    if n == 0 {
        return ColumnType::String { max_length: 0 };
    }
    let integer_count = column.values().filter(|v| v.parse::<i64>().is_ok()).count();
    let double_count = column.values().filter(|v| v.parse::<f64>().is_ok()).count();

    if integer_count as f64 / n as f64 >= threshold && integer_count >= double_count {
        ColumnType::Integer
    } else if double_count as f64 / n as f64 >= threshold {
        ColumnType::Double
    } else {
        ColumnType::String {
            max_length: column.values().map(|v| v.len()).max().unwrap_or(0),
        }
    }
}
