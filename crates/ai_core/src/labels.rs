//! Disease-name label encoding
//!
//! Class indices are assigned in sorted label order so that a fitted encoder
//! is fully described by its class list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::{AiCoreError, Result};

/// Bidirectional mapping between disease names and class indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderRepr", into = "LabelEncoderRepr")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct LabelEncoderRepr {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on the distinct labels of `labels`
    pub fn fit<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        if distinct.is_empty() {
            return Err(AiCoreError::EmptyLabelSet);
        }

        Ok(Self {
            classes: distinct.into_iter().collect(),
        })
    }

    /// Class index for `label`
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map_err(|_| AiCoreError::UnknownLabel(label.to_string()))
    }

    /// Encode every label, failing on the first unseen one
    pub fn encode_all<I, S>(&self, labels: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.encode(label.as_ref()))
            .collect()
    }

    /// Disease name for a class index
    pub fn decode(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(AiCoreError::ClassIndexOutOfRange {
                index,
                classes: self.classes.len(),
            })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TryFrom<LabelEncoderRepr> for LabelEncoder {
    type Error = AiCoreError;

    fn try_from(repr: LabelEncoderRepr) -> Result<Self> {
        if repr.classes.is_empty() {
            return Err(AiCoreError::EmptyLabelSet);
        }
        if repr.classes.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(AiCoreError::ArtifactMismatch(
                "label encoder classes must be sorted and distinct".to_string(),
            ));
        }
        Ok(Self {
            classes: repr.classes,
        })
    }
}

impl From<LabelEncoder> for LabelEncoderRepr {
    fn from(encoder: LabelEncoder) -> Self {
        Self {
            classes: encoder.classes,
        }
    }
}
