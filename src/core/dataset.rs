use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of chart data: field name to value.
pub type Record = Map<String, Value>;

/// Ordered records recovered from a chart instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Accepts an array whose elements are all objects. Any other shape is
    /// rejected so callers can move on to another source.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        items
            .iter()
            .map(|item| item.as_object().cloned())
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names taken from the first record.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.records
            .first()
            .map(|record| record.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Array(self.records.iter().cloned().map(Value::Object).collect())
    }
}

/// Formats one data-preview cell.
#[must_use]
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_owned(),
        Some(Value::String(text)) => text.clone(),
        // Objects and arrays render as compact JSON, scalars as their literal.
        Some(value) => value.to_string(),
    }
}

/// Tabular projection of a dataset for the data-preview view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let columns = dataset.columns();
        let rows = dataset
            .records()
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| format_cell(record.get(column)))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        match self.rows.len() {
            1 => "1 record".to_owned(),
            count => format!("{count} records"),
        }
    }
}
