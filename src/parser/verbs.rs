//! Verb-to-list mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default verbs and the lists they move a card to.
pub const DEFAULT_VERBS: &[(&str, &str)] = &[
    ("developing", "Development"),
    ("coding", "Development"),
    ("testing", "Testing"),
    ("waiting", "User Acceptance"),
    ("finishing", "Done"),
    ("finished", "Done"),
];

/// Maps a leading verb in a directive line to the name of a list.
///
/// Keys are stored lowercased and lookups lowercase the token, so verbs
/// match case-insensitively. A mapping is always replaced as a whole;
/// there is no merging with the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct VerbMapping {
    verbs: BTreeMap<String, String>,
}

impl Default for VerbMapping {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_VERBS.iter().copied())
    }
}

impl VerbMapping {
    /// A mapping with no verbs: no line ever moves a card.
    pub fn empty() -> Self {
        Self {
            verbs: BTreeMap::new(),
        }
    }

    /// Build a mapping from `(verb, list)` pairs, rejecting verbs that are
    /// equal ignoring case.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut verbs = BTreeMap::new();
        for (verb, list) in pairs {
            let key = verb.as_ref().to_lowercase();
            if verbs.contains_key(&key) {
                return Err(format!(
                    "verb '{}' is listed more than once (verbs match case-insensitively)",
                    verb.as_ref()
                ));
            }
            verbs.insert(key, list.into());
        }
        Ok(Self { verbs })
    }

    /// Build a mapping from `(verb, list)` pairs. A later verb that is
    /// equal to an earlier one ignoring case replaces it.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            verbs: pairs
                .into_iter()
                .map(|(verb, list)| (verb.as_ref().to_lowercase(), list.into()))
                .collect(),
        }
    }

    /// Look up the list for a token, ignoring case.
    pub fn list_for(&self, token: &str) -> Option<&str> {
        self.verbs.get(&token.to_lowercase()).map(String::as_str)
    }

    /// Iterate over `(verb, list)` pairs in verb order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.verbs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

impl TryFrom<BTreeMap<String, String>> for VerbMapping {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::try_from_pairs(map)
    }
}

impl From<VerbMapping> for BTreeMap<String, String> {
    fn from(mapping: VerbMapping) -> Self {
        mapping.verbs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_workflow_verbs() {
        let verbs = VerbMapping::default();
        assert_eq!(verbs.len(), 6);
        assert_eq!(verbs.list_for("developing"), Some("Development"));
        assert_eq!(verbs.list_for("coding"), Some("Development"));
        assert_eq!(verbs.list_for("testing"), Some("Testing"));
        assert_eq!(verbs.list_for("waiting"), Some("User Acceptance"));
        assert_eq!(verbs.list_for("finishing"), Some("Done"));
        assert_eq!(verbs.list_for("finished"), Some("Done"));
    }

    #[test]
    fn lookup_ignores_case() {
        let verbs = VerbMapping::default();
        assert_eq!(verbs.list_for("Testing"), Some("Testing"));
        assert_eq!(verbs.list_for("FINISHED"), Some("Done"));
        assert_eq!(verbs.list_for("board"), None);
    }

    #[test]
    fn custom_mapping_replaces_defaults() {
        let verbs = VerbMapping::from_pairs([("Review", "Code Review")]);
        assert_eq!(verbs.len(), 1);
        assert_eq!(verbs.list_for("review"), Some("Code Review"));
        assert_eq!(verbs.list_for("testing"), None);
    }

    #[test]
    fn deserializes_from_yaml_map() {
        let verbs: VerbMapping = serde_yaml::from_str("Shipping: Released\nqa: QA\n").unwrap();
        assert_eq!(verbs.list_for("shipping"), Some("Released"));
        assert_eq!(verbs.list_for("QA"), Some("QA"));
        assert!(!verbs.is_empty());
    }

    #[test]
    fn yaml_keys_differing_only_in_case_are_rejected() {
        let err = serde_yaml::from_str::<VerbMapping>("Testing: QA\ntesting: Review\n")
            .unwrap_err();
        assert!(err.to_string().contains("listed more than once"));
    }

    #[test]
    fn try_from_pairs_rejects_case_collisions() {
        let err = VerbMapping::try_from_pairs([("Ship", "Done"), ("SHIP", "Released")])
            .unwrap_err();
        assert!(err.contains("'SHIP'"));

        let verbs = VerbMapping::try_from_pairs([("ship", "Done"), ("qa", "QA")]).unwrap();
        assert_eq!(verbs.len(), 2);
    }

    #[test]
    fn empty_mapping_has_no_verbs() {
        let verbs = VerbMapping::empty();
        assert!(verbs.is_empty());
        assert_eq!(verbs.list_for("testing"), None);
    }
}
