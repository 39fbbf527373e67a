//! Static prediction rules
//!
//! Exact (plant, symptom set) combinations mapped to a disease. Anything not
//! listed has no prediction.

use agrodx_ai_core::SymptomId;
use std::collections::{BTreeSet, HashMap};

/// Plant identifier as stored by the diagnosis backend
pub type PlantId = i64;

const RULES: &[(PlantId, &[SymptomId], &str)] = &[
    // Tomato
    (1, &[1, 2], "Early Blight"),
    (1, &[1, 2, 5], "Late Blight"),
    (1, &[2, 3], "Fusarium Wilt"),
    (1, &[7], "Powdery Mildew"),
    (1, &[2, 3, 8], "Cucumber Mosaic Virus"),
    // Potato
    (2, &[1, 2], "Early Blight"),
    (2, &[1, 4], "Late Blight"),
    (2, &[7], "Powdery Mildew"),
    // Corn
    (3, &[3, 6], "Corn Common Rust"),
    // Cucumber
    (4, &[2, 8], "Cucumber Mosaic Virus"),
    (4, &[7], "Powdery Mildew"),
];

/// Lookup table keyed by plant and symptom set
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<(PlantId, BTreeSet<SymptomId>), &'static str>,
}

impl RuleTable {
    /// Table with the built-in rules
    pub fn builtin() -> Self {
        let rules = RULES
            .iter()
            .map(|(plant, symptoms, disease)| {
                ((*plant, symptoms.iter().copied().collect::<BTreeSet<_>>()), *disease)
            })
            .collect();
        Self { rules }
    }

    /// Disease for an exact plant/symptom-set match
    pub fn lookup<I>(&self, plant_id: PlantId, symptom_ids: I) -> Option<&'static str>
    where
        I: IntoIterator<Item = SymptomId>,
    {
        let key = (plant_id, symptom_ids.into_iter().collect::<BTreeSet<_>>());
        self.rules.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent_match() {
        let table = RuleTable::builtin();
        assert_eq!(table.lookup(1, [2, 1]), Some("Early Blight"));
        assert_eq!(table.lookup(1, [1, 2]), Some("Early Blight"));
        assert_eq!(table.lookup(3, [6, 3]), Some("Corn Common Rust"));
    }

    #[test]
    fn test_exact_set_required() {
        let table = RuleTable::builtin();
        assert_eq!(table.lookup(1, [1, 2, 5]), Some("Late Blight"));
        assert_eq!(table.lookup(1, [1, 2, 9]), None);
        assert_eq!(table.lookup(1, [1]), None);
    }

    #[test]
    fn test_duplicates_ignored() {
        let table = RuleTable::builtin();
        assert_eq!(table.lookup(4, [7, 7]), Some("Powdery Mildew"));
    }

    #[test]
    fn test_plant_matters() {
        let table = RuleTable::builtin();
        assert_eq!(table.lookup(2, [1, 4]), Some("Late Blight"));
        assert_eq!(table.lookup(1, [1, 4]), None);
        assert_eq!(table.lookup(99, [1, 2]), None);
    }

    #[test]
    fn test_builtin_size() {
        assert_eq!(RuleTable::builtin().len(), RULES.len());
    }
}
