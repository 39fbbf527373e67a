//! Symptom-presence encoding
//!
//! Turns an observed set of symptom ids into a binary vector laid out by the
//! feature schema. Unknown ids are ignored so that a stale client never
//! blocks a prediction.

use std::collections::BTreeSet;
use tracing::warn;

use crate::schema::{FeatureSchema, SymptomId};

/// Binary presence vector (1 = symptom observed)
pub type PresenceVector = Vec<u8>;

/// Encoded vector plus the ids the schema did not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSymptoms {
    pub features: PresenceVector,
    pub ignored: Vec<SymptomId>,
}

/// Encode observed symptom ids against `schema`.
///
/// Duplicates and input order do not matter. An empty schema yields the
/// single-zero vector `[0]`.
pub fn encode_symptoms<I>(symptom_ids: I, schema: &FeatureSchema) -> EncodedSymptoms
where
    I: IntoIterator<Item = SymptomId>,
{
    if schema.is_empty() {
        return EncodedSymptoms {
            features: vec![0],
            ignored: Vec::new(),
        };
    }

    let observed: BTreeSet<SymptomId> = symptom_ids.into_iter().collect();
    let mut features = vec![0u8; schema.len()];
    let mut ignored = Vec::new();

    for id in observed {
        match schema.index_of(id) {
            Some(idx) => features[idx] = 1,
            None => {
                warn!(
                    "Symptom ID {} is not part of the trained feature schema; ignoring it",
                    id
                );
                ignored.push(id);
            }
        }
    }

    EncodedSymptoms { features, ignored }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_known_symptoms() {
        let schema = FeatureSchema::for_symptom_range(5);
        let encoded = encode_symptoms([1, 2, 5], &schema);
        assert_eq!(encoded.features, vec![1, 1, 0, 0, 1]);
        assert!(encoded.ignored.is_empty());
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let schema = FeatureSchema::for_symptom_range(5);
        let a = encode_symptoms([2, 1, 2, 1], &schema);
        let b = encode_symptoms([1, 2], &schema);
        assert_eq!(a.features, b.features);
    }

    #[test]
    fn test_unknown_symptoms_are_ignored() {
        let schema = FeatureSchema::for_symptom_range(5);
        let baseline = encode_symptoms([1, 3], &schema);
        let noisy = encode_symptoms([1, 3, 99, -4, 0], &schema);

        assert_eq!(baseline.features, noisy.features);
        assert_eq!(noisy.ignored, vec![-4, 0, 99]);
    }

    #[test]
    fn test_empty_schema_yields_single_zero() {
        let schema = FeatureSchema::new(Vec::new()).unwrap();
        let encoded = encode_symptoms([1, 2], &schema);
        assert_eq!(encoded.features, vec![0]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let schema = FeatureSchema::for_symptom_range(20);
        let ids = vec![17, 3, 8, 3, 42];
        let first = encode_symptoms(ids.clone(), &schema);
        let second = encode_symptoms(ids, &schema);
        assert_eq!(first, second);
    }
}
