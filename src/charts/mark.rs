use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// Geometry a mark draws its records as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Interval,
    Line,
    Point,
    Area,
}

impl MarkKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Line => "line",
            Self::Point => "point",
            Self::Area => "area",
        }
    }
}

/// Everything a script has declared on one mark.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkSpec {
    pub kind: MarkKind,
    /// Channel name to field name (string) or constant (number, color).
    pub encode: IndexMap<String, Value>,
    pub style: Map<String, Value>,
    pub data: Option<Value>,
    pub transforms: Vec<Value>,
    pub legend: Option<Value>,
    pub labels: Vec<Value>,
    pub tooltip: Option<Value>,
}

impl MarkSpec {
    #[must_use]
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            encode: IndexMap::new(),
            style: Map::new(),
            data: None,
            transforms: Vec::new(),
            legend: None,
            labels: Vec::new(),
            tooltip: None,
        }
    }

    /// Field name bound to `channel`, if the channel is field-encoded.
    #[must_use]
    pub fn field(&self, channel: &str) -> Option<&str> {
        self.encode.get(channel).and_then(Value::as_str)
    }

    #[must_use]
    pub fn style_f64(&self, key: &str) -> Option<f64> {
        self.style.get(key).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn style_str(&self, key: &str) -> Option<&str> {
        self.style.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut spec = json!({
            "type": self.kind.as_str(),
            "encode": Value::Object(self.encode.clone().into_iter().collect()),
            "style": Value::Object(self.style.clone()),
        });
        if let Some(object) = spec.as_object_mut() {
            if let Some(data) = &self.data {
                object.insert("data".to_owned(), data.clone());
            }
            if !self.transforms.is_empty() {
                object.insert("transform".to_owned(), Value::Array(self.transforms.clone()));
            }
            if let Some(legend) = &self.legend {
                object.insert("legend".to_owned(), legend.clone());
            }
            if !self.labels.is_empty() {
                object.insert("labels".to_owned(), Value::Array(self.labels.clone()));
            }
            if let Some(tooltip) = &self.tooltip {
                object.insert("tooltip".to_owned(), tooltip.clone());
            }
        }
        spec
    }
}

/// Script-side handle to a mark; clones share the same spec.
#[derive(Clone)]
pub struct MarkObject {
    spec: Rc<RefCell<MarkSpec>>,
}

impl MarkObject {
    #[must_use]
    pub fn new(kind: MarkKind) -> Self {
        Self {
            spec: Rc::new(RefCell::new(MarkSpec::new(kind))),
        }
    }

    #[must_use]
    pub fn kind(&self) -> MarkKind {
        self.spec.borrow().kind
    }

    #[must_use]
    pub fn spec(&self) -> MarkSpec {
        self.spec.borrow().clone()
    }

    pub fn set_encode(&self, channel: &str, value: Value) {
        self.spec.borrow_mut().encode.insert(channel.to_owned(), value);
    }

    pub fn set_style(&self, key: &str, value: Value) {
        self.spec.borrow_mut().style.insert(key.to_owned(), value);
    }

    pub fn set_data(&self, data: Value) {
        self.spec.borrow_mut().data = Some(data);
    }

    pub fn push_transform(&self, transform: Value) {
        self.spec.borrow_mut().transforms.push(transform);
    }

    pub fn set_legend(&self, legend: Value) {
        self.spec.borrow_mut().legend = Some(legend);
    }

    pub fn push_label(&self, label: Value) {
        self.spec.borrow_mut().labels.push(label);
    }

    pub fn set_tooltip(&self, tooltip: Value) {
        self.spec.borrow_mut().tooltip = Some(tooltip);
    }
}

impl PartialEq for MarkObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.spec, &other.spec)
    }
}

impl fmt::Debug for MarkObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MarkObject").field(&self.spec.borrow()).finish()
    }
}
