use serde_json::{Map, Value};

/// Untyped input table: a header row plus positional string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds a table from JSON objects. Headers are the union of keys in first-seen
    /// order; keys a row does not carry become blank cells.
    pub fn from_json_rows(rows: &[Map<String, Value>]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let cells = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|header| row.get(header).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self::new(headers, cells)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}
