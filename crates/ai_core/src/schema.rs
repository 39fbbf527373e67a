//! Feature schema shared by training and inference
//!
//! The schema is the ordered list of symptom-presence columns. Its order
//! defines the layout of every feature vector, so it is persisted next to
//! the model and reloaded verbatim.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{AiCoreError, Result};

/// Symptom identifier as stored by the diagnosis backend
pub type SymptomId = i64;

/// Column name for a symptom id (`symptom_{id}_present`)
pub fn column_for_symptom(id: SymptomId) -> String {
    format!("symptom_{id}_present")
}

/// Ordered feature columns with a reverse index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from explicit column names, rejecting duplicates
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if positions.insert(column.clone(), idx).is_some() {
                return Err(AiCoreError::DuplicateFeature(column.clone()));
            }
        }
        Ok(Self { columns, positions })
    }

    /// Schema with one column per symptom id in `1..=max_symptom_id`
    pub fn for_symptom_range(max_symptom_id: SymptomId) -> Self {
        let columns: Vec<String> = (1..=max_symptom_id).map(column_for_symptom).collect();
        let positions = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.clone(), idx))
            .collect();
        Self { columns, positions }
    }

    /// Position of the column for `id`, if the schema knows it
    pub fn index_of(&self, id: SymptomId) -> Option<usize> {
        self.positions.get(&column_for_symptom(id)).copied()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = AiCoreError;

    fn try_from(columns: Vec<String>) -> Result<Self> {
        Self::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symptom_range_layout() {
        let schema = FeatureSchema::for_symptom_range(3);
        assert_eq!(
            schema.columns(),
            &[
                "symptom_1_present".to_string(),
                "symptom_2_present".to_string(),
                "symptom_3_present".to_string(),
            ]
        );
        assert_eq!(schema.index_of(1), Some(0));
        assert_eq!(schema.index_of(3), Some(2));
        assert_eq!(schema.index_of(4), None);
        assert_eq!(schema.index_of(0), None);
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = FeatureSchema::new(vec![
            "symptom_1_present".to_string(),
            "symptom_1_present".to_string(),
        ]);
        assert!(matches!(result, Err(AiCoreError::DuplicateFeature(_))));
    }

    #[test]
    fn test_schema_serializes_as_plain_array() {
        let schema = FeatureSchema::for_symptom_range(2);
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["symptom_1_present","symptom_2_present"]"#);

        let back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
        assert_eq!(back.index_of(2), Some(1));
    }

    #[test]
    fn test_custom_order_is_preserved() {
        let schema = FeatureSchema::new(vec![
            column_for_symptom(7),
            column_for_symptom(2),
        ])
        .unwrap();
        assert_eq!(schema.index_of(7), Some(0));
        assert_eq!(schema.index_of(2), Some(1));
    }

    #[test]
    fn test_duplicate_json_rejected_on_load() {
        let result: std::result::Result<FeatureSchema, _> =
            serde_json::from_str(r#"["symptom_1_present","symptom_1_present"]"#);
        assert!(result.is_err());
    }
}
