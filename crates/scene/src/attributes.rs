use serde::Serialize;
use services::{FeatureRecord, display_value};

pub const NO_FEATURES: &str = "No features found";

/// Tabular view of selected features.
///
/// Headers are the union of attribute keys in first-seen order, without the
/// geometry column. Cells for missing or falsy values are blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeTable {
    pub headers: Vec<String>,
    pub rows: Vec<AttributeRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeRow {
    /// Numbered from 1.
    Feature { number: usize, cells: Vec<String> },
    Placeholder { text: String },
}

impl AttributeTable {
    pub fn from_features(features: &[FeatureRecord]) -> Self {
        if features.is_empty() {
            return Self {
                headers: Vec::new(),
                rows: vec![AttributeRow::Placeholder {
                    text: NO_FEATURES.to_string(),
                }],
            };
        }

        let mut headers: Vec<String> = Vec::new();
        for f in features {
            for key in f.attribute_keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.to_string());
                }
            }
        }

        let rows = features
            .iter()
            .enumerate()
            .map(|(i, f)| AttributeRow::Feature {
                number: i + 1,
                cells: headers
                    .iter()
                    .map(|h| f.property(h).and_then(display_value).unwrap_or_default())
                    .collect(),
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        !self
            .rows
            .iter()
            .any(|r| matches!(r, AttributeRow::Feature { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeRow, AttributeTable};
    use pretty_assertions::assert_eq;
    use services::FeatureRecord;

    fn record(json: serde_json::Value) -> FeatureRecord {
        let serde_json::Value::Object(props) = json else {
            unreachable!()
        };
        FeatureRecord::new(props, None)
    }

    #[test]
    fn no_features_gives_placeholder_row() {
        let table = AttributeTable::from_features(&[]);
        assert!(table.headers.is_empty());
        assert_eq!(
            table.rows,
            vec![AttributeRow::Placeholder {
                text: "No features found".to_string()
            }]
        );
        assert!(table.is_empty());
    }

    #[test]
    fn header_is_union_in_first_seen_order() {
        let features = [
            record(serde_json::json!({"A": "a1", "geom": "x", "B": 2})),
            record(serde_json::json!({"C": "c2", "A": null})),
            record(serde_json::json!({"B": 0, "C": "c3", "A": "a3"})),
        ];
        let table = AttributeTable::from_features(&features);

        assert_eq!(table.headers, vec!["A", "B", "C"]);
        assert_eq!(
            table.rows,
            vec![
                AttributeRow::Feature {
                    number: 1,
                    cells: vec!["a1".into(), "2".into(), "".into()]
                },
                AttributeRow::Feature {
                    number: 2,
                    cells: vec!["".into(), "".into(), "c2".into()]
                },
                AttributeRow::Feature {
                    number: 3,
                    cells: vec!["a3".into(), "".into(), "c3".into()]
                },
            ]
        );
        assert!(!table.is_empty());
    }
}
