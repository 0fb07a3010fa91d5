use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single cell of a tabular result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Display form used for labels, callouts and group keys.
    /// Null renders as the empty string.
    pub fn display(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<&Value> for Scalar {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Scalar::Null,
            Value::Bool(b) => Scalar::Bool(*b),
            Value::Number(n) => n.as_f64().map(Scalar::Number).unwrap_or(Scalar::Null),
            Value::String(s) => Scalar::Text(s.clone()),
            // Nested values are not chartable; keep their JSON text for display
            other => Scalar::Text(other.to_string()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// Rows of a query result, all sharing the column order of row 0
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularResult {
    columns: Vec<String>,
    rows: Vec<Vec<Scalar>>,
}

impl TabularResult {
    /// Build from explicit columns and positional rows. Short rows are padded with nulls
    /// and long rows truncated so every row matches the column set.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Scalar::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Build from JSON records (column name → value). Column order is taken from the
    /// first record; later records are read by name.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let columns: Vec<String> = records
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|col| record.get(col).map(Scalar::from).unwrap_or(Scalar::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &Scalar {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&Scalar::Null)
    }

    /// Records back out as JSON objects, preserving column order.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (col, cell) in self.columns.iter().zip(row) {
                    obj.insert(col.clone(), cell.to_json());
                }
                Value::Object(obj)
            })
            .collect()
    }
}

/// Role a column plays when a result is charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Label,
    Value,
}

/// Chartable x coordinate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum XValue {
    Temporal(DateTime<Utc>),
    Numeric(f64),
    /// 1-based position of a categorical value
    Ordinal(usize),
}

impl XValue {
    /// Numeric key x values sort by
    pub fn ordering_key(&self) -> f64 {
        match self {
            XValue::Temporal(dt) => dt.timestamp_millis() as f64,
            XValue::Numeric(n) => *n,
            XValue::Ordinal(i) => *i as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: XValue,
    pub y: f64,
    pub callout_label: String,
    pub callout_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One named line of a line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub style: LineStyle,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSet {
    pub series: Vec<Series>,
}

/// One bar / pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalItem {
    pub label: String,
    pub value: f64,
    /// Share of the total in percent (0 when the total is 0)
    pub percent_of_total: f64,
    pub callout: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSet {
    pub label_key: String,
    pub value_key: String,
    pub total: f64,
    pub items: Vec<CategoricalItem>,
}

/// Page view from the event log
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Event {
    pub session_id: String,
    pub path: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Aggregated transition between two paths at a given step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub step: usize,
    pub source: String,
    pub target: String,
    pub count: usize,
}

/// Funnel output. Empty (no nodes, no edges) when no session visited the anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<FlowEdge>,
    /// Sessions that entered the funnel
    pub sessions: usize,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// API Response
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data: Some(data),
            request_id: None,
        }
    }

    /// Valid request with nothing to render
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            status: "empty".to_string(),
            message: message.into(),
            data: None,
            request_id: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Map<String, Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_records_keeps_first_row_column_order() {
        let rows = records(json!([
            {"views": 10, "day": "2025-01-01"},
            {"day": "2025-01-02", "views": 20}
        ]));
        let result = TabularResult::from_records(&rows);

        assert_eq!(result.columns(), &["views".to_string(), "day".to_string()]);
        assert_eq!(result.cell(1, 0), &Scalar::Number(20.0));
        assert_eq!(result.cell(1, 1), &Scalar::Text("2025-01-02".into()));
    }

    #[test]
    fn test_missing_cells_become_null() {
        let rows = records(json!([{"a": 1, "b": 2}, {"a": 3}]));
        let result = TabularResult::from_records(&rows);
        assert_eq!(result.cell(1, 1), &Scalar::Null);
        assert_eq!(result.cell(9, 9), &Scalar::Null);
    }

    #[test]
    fn test_new_pads_short_rows() {
        let result = TabularResult::new(
            vec!["a".into(), "b".into()],
            vec![vec![Scalar::from(1.0)]],
        );
        assert_eq!(result.rows()[0].len(), 2);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(10.0).display(), "10");
        assert_eq!(Scalar::Number(2.5).display(), "2.5");
        assert_eq!(Scalar::Null.display(), "");
    }

    #[test]
    fn test_scalar_deserializes_untagged() {
        let cells: Vec<Scalar> = serde_json::from_value(json!([null, 3, "x", true])).unwrap();
        assert_eq!(
            cells,
            vec![
                Scalar::Null,
                Scalar::Number(3.0),
                Scalar::Text("x".into()),
                Scalar::Bool(true)
            ]
        );
    }

    #[test]
    fn test_to_records_round_trips_column_order() {
        let rows = records(json!([{"z": "a", "y": 1}]));
        let result = TabularResult::from_records(&rows);
        let out = result.to_records();
        let keys: Vec<&String> = out[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "y"]);
    }
}
