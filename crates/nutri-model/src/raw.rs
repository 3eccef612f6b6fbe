use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mapping::RecordLayout;

/// A single cell as it appears in a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Text form of the cell, `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Number(value) => Some(value.to_string()),
            RawValue::Text(value) => Some(value.clone()),
            RawValue::Null => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One record of a source document before mapping.
///
/// Legacy table extractions produce positional rows, newer exports keyed
/// objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    Positional(Vec<RawValue>),
    Keyed(BTreeMap<String, RawValue>),
}

impl RawRecord {
    pub fn layout(&self) -> RecordLayout {
        match self {
            RawRecord::Positional(_) => RecordLayout::Positional,
            RawRecord::Keyed(_) => RecordLayout::Keyed,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            RawRecord::Positional(values) => values.len(),
            RawRecord::Keyed(values) => values.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_both_shapes() {
        let positional: RawRecord = serde_json::from_str(r#"["6300101", "Arroz", 3.51, null]"#).unwrap();
        assert_eq!(positional.layout(), RecordLayout::Positional);
        assert_eq!(positional.width(), 4);
        if let RawRecord::Positional(values) = &positional {
            assert_eq!(values[2], RawValue::Number(3.51));
            assert_eq!(values[3], RawValue::Null);
        }

        let keyed: RawRecord =
            serde_json::from_str(r#"{"descricao": "Arroz", "ferro_mg": "0,3"}"#).unwrap();
        assert_eq!(keyed.layout(), RecordLayout::Keyed);
        assert_eq!(keyed.width(), 2);
    }
}
