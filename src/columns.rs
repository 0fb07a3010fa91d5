//! Label/value column detection for two-dimensional charts.

use serde::Serialize;

use crate::models::{ColumnRole, Scalar};
use crate::numeric::is_numeric_like;

/// Which of the first two columns is the label and which the value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub label_key: String,
    pub value_key: String,
    pub label_index: usize,
    pub value_index: usize,
}

impl ColumnRoles {
    /// True when the value column was projected before the label column
    pub fn swapped(&self) -> bool {
        self.value_index < self.label_index
    }

    pub fn role_of(&self, index: usize) -> Option<ColumnRole> {
        if index == self.label_index {
            Some(ColumnRole::Label)
        } else if index == self.value_index {
            Some(ColumnRole::Value)
        } else {
            None
        }
    }
}

/// Classify columns 0 and 1 using the first row as a sample.
///
/// Declared order wins unless column 0 is numeric-like and column 1 is not, which
/// happens when a query projects the aggregate before its grouping key.
/// Returns `None` with fewer than two columns.
pub fn detect_roles(columns: &[String], first_row: &[Scalar]) -> Option<ColumnRoles> {
    if columns.len() < 2 {
        return None;
    }

    let null = Scalar::Null;
    let first = first_row.first().unwrap_or(&null);
    let second = first_row.get(1).unwrap_or(&null);

    let (label_index, value_index) = if is_numeric_like(first) && !is_numeric_like(second) {
        (1, 0)
    } else {
        (0, 1)
    };

    Some(ColumnRoles {
        label_key: columns[label_index].clone(),
        value_key: columns[value_index].clone(),
        label_index,
        value_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_label_first_keeps_order() {
        let roles = detect_roles(
            &cols(&["page", "views"]),
            &[Scalar::from("/home"), Scalar::Number(12.0)],
        )
        .unwrap();
        assert_eq!(roles.label_key, "page");
        assert_eq!(roles.value_key, "views");
        assert!(!roles.swapped());
    }

    #[test]
    fn test_numeric_first_swaps() {
        let roles = detect_roles(
            &cols(&["views", "page"]),
            &[Scalar::Number(12.0), Scalar::from("/home")],
        )
        .unwrap();
        assert_eq!(roles.label_key, "page");
        assert_eq!(roles.value_key, "views");
        assert!(roles.swapped());
        assert_eq!(roles.role_of(0), Some(ColumnRole::Value));
        assert_eq!(roles.role_of(1), Some(ColumnRole::Label));
    }

    #[test]
    fn test_numeric_string_first_swaps() {
        let roles = detect_roles(
            &cols(&["count", "source"]),
            &[Scalar::from("7"), Scalar::from("(direct)")],
        )
        .unwrap();
        assert!(roles.swapped());
    }

    #[test]
    fn test_both_numeric_keeps_order() {
        let roles = detect_roles(
            &cols(&["year", "views"]),
            &[Scalar::Number(2025.0), Scalar::Number(3.0)],
        )
        .unwrap();
        assert_eq!(roles.label_key, "year");
        assert!(!roles.swapped());
    }

    #[test]
    fn test_third_column_has_no_role() {
        let roles = detect_roles(
            &cols(&["a", "b", "c"]),
            &[Scalar::from("x"), Scalar::Number(1.0), Scalar::Number(2.0)],
        )
        .unwrap();
        assert_eq!(roles.role_of(2), None);
    }

    #[test]
    fn test_single_column_is_not_chartable() {
        assert!(detect_roles(&cols(&["only"]), &[Scalar::Number(1.0)]).is_none());
        assert!(detect_roles(&[], &[]).is_none());
    }
}
