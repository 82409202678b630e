use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Resolved mapping of configured exclusion tag names to the library tool's
/// numeric tag IDs. Names are matched case-insensitively; configured names
/// with no matching label are kept so callers can warn about them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagMap {
    by_name: HashMap<String, u64>,
    unresolved: Vec<String>,
}

impl TagMap {
    pub fn resolve(configured: &[String], labels: &[(u64, String)]) -> Self {
        let mut by_name = HashMap::new();
        let mut unresolved = Vec::new();

        for name in configured {
            let wanted = name.to_lowercase();
            match labels.iter().find(|(_, label)| label.to_lowercase() == wanted) {
                Some((id, _)) => {
                    by_name.insert(wanted, *id);
                }
                None => unresolved.push(name.clone()),
            }
        }

        Self { by_name, unresolved }
    }

    pub fn ids(&self) -> HashSet<u64> {
        self.by_name.values().copied().collect()
    }

    /// Configured names that did not match any tag label.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Label for a resolved tag ID, for display.
    pub fn name_for(&self, id: u64) -> Option<&str> {
        self.by_name
            .iter()
            .find(|(_, tag_id)| **tag_id == id)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_case_insensitive() {
        let configured = vec!["Keep".to_string(), "donotdelete".to_string()];
        let labels = vec![(1, "keep".to_string()), (5, "DoNotDelete".to_string())];

        let map = TagMap::resolve(&configured, &labels);
        assert_eq!(map.ids(), HashSet::from([1, 5]));
        assert!(map.unresolved().is_empty());
    }

    #[test]
    fn test_resolve_reports_missing_names() {
        let configured = vec!["keep".to_string(), "archive".to_string()];
        let labels = vec![(1, "keep".to_string())];

        let map = TagMap::resolve(&configured, &labels);
        assert_eq!(map.ids(), HashSet::from([1]));
        assert_eq!(map.unresolved(), &["archive".to_string()]);
    }

    #[test]
    fn test_name_for() {
        let configured = vec!["keep".to_string()];
        let labels = vec![(7, "keep".to_string())];

        let map = TagMap::resolve(&configured, &labels);
        assert_eq!(map.name_for(7), Some("keep"));
        assert_eq!(map.name_for(8), None);
    }
}
