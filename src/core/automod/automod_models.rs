// Automod domain models - data structures for the banned-word filter.
//
// These are pure domain types with no Discord dependencies.
// The Discord layer converts match outcomes into message deletions.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed id of the one persisted document this feature owns.
pub const MODULE_ID: &str = "automod";

/// A behavior modifier attached to a rule when it is created.
///
/// Flag strings we don't recognize (from older or hand-edited documents) are
/// kept as `Other` so they survive a load/save cycle, but they have no effect
/// on matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleFlag {
    /// Delete any message containing a match.
    Delete,
    /// Match only when the word appears as a standalone space-delimited token.
    Whole,
    /// Match case-sensitively. Absent means case-insensitive.
    Case,
    /// Unrecognized flag string, preserved verbatim.
    Other(String),
}

impl RuleFlag {
    pub fn as_str(&self) -> &str {
        match self {
            RuleFlag::Delete => "delete",
            RuleFlag::Whole => "whole",
            RuleFlag::Case => "case",
            RuleFlag::Other(s) => s,
        }
    }
}

impl From<String> for RuleFlag {
    fn from(s: String) -> Self {
        match s.as_str() {
            "delete" => RuleFlag::Delete,
            "whole" => RuleFlag::Whole,
            "case" => RuleFlag::Case,
            _ => RuleFlag::Other(s),
        }
    }
}

impl From<RuleFlag> for String {
    fn from(flag: RuleFlag) -> Self {
        flag.as_str().to_string()
    }
}

impl fmt::Display for RuleFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single banned-word entry. The word is the unique key within the rule
/// set; flags are fixed at creation (changing them means remove + re-add).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub word: String,
    pub flags: Vec<RuleFlag>,
}

impl Rule {
    pub fn new(word: impl Into<String>, flags: Vec<RuleFlag>) -> Self {
        Self {
            word: word.into(),
            flags,
        }
    }

    pub fn deletes(&self) -> bool {
        self.flags.contains(&RuleFlag::Delete)
    }

    pub fn is_whole_word(&self) -> bool {
        self.flags.contains(&RuleFlag::Whole)
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.flags.contains(&RuleFlag::Case)
    }
}

/// The full banned-word collection, keyed by word.
///
/// Insertion order is preserved: it determines both the scan order during
/// message evaluation and the listing order shown to admins. Serialized as a
/// JSON object of `word: [flags]` members in stored order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn contains(&self, word: &str) -> bool {
        self.rules.iter().any(|r| r.word == word)
    }

    #[allow(dead_code)]
    pub fn get(&self, word: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.word == word)
    }

    /// Insert a rule at the end of the scan order. Returns `false` (leaving
    /// the set untouched) when the word is already present.
    pub fn insert(&mut self, rule: Rule) -> bool {
        if self.contains(&rule.word) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Remove the rule for `word`. Returns `false` when it was not present.
    pub fn remove(&mut self, word: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.word != word);
        self.rules.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.word, &rule.flags)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of banned word to flag list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RuleSet, A::Error> {
                let mut set = RuleSet::default();
                while let Some((word, flags)) = access.next_entry::<String, Vec<RuleFlag>>()? {
                    set.insert(Rule::new(word, flags));
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}

/// The persisted document for this feature. Fields we don't model (room for
/// future additions like per-member notes) are carried through load/save
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoModDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "bannedWords", default)]
    pub banned_words: RuleSet,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for AutoModDocument {
    fn default() -> Self {
        Self {
            id: MODULE_ID.to_string(),
            banned_words: RuleSet::default(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Outcome of scanning a message against the rule set: the first rule that
/// matched structurally, and whether it asks for deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub word: String,
    pub delete: bool,
}

/// Render rules as newline-delimited `word: flag flag ...` lines in stored
/// order. An empty rule set renders as an empty string.
pub fn format_rules(rules: &[Rule]) -> String {
    rules
        .iter()
        .map(|rule| {
            let flags: Vec<&str> = rule.flags.iter().map(RuleFlag::as_str).collect();
            format!("{}: {}", rule.word, flags.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_serialize_as_plain_strings() {
        assert_eq!(serde_json::to_value(RuleFlag::Delete).unwrap(), json!("delete"));
        assert_eq!(serde_json::to_value(RuleFlag::Whole).unwrap(), json!("whole"));
        assert_eq!(serde_json::to_value(RuleFlag::Case).unwrap(), json!("case"));

        let unknown: RuleFlag = serde_json::from_value(json!("warn")).unwrap();
        assert_eq!(unknown, RuleFlag::Other("warn".to_string()));
        assert_eq!(serde_json::to_value(unknown).unwrap(), json!("warn"));
    }

    #[test]
    fn rule_set_round_trips_in_insertion_order() {
        let mut set = RuleSet::default();
        set.insert(Rule::new("zebra", vec![RuleFlag::Delete]));
        set.insert(Rule::new("apple", vec![RuleFlag::Whole, RuleFlag::Case]));
        set.insert(Rule::new("mango", vec![]));

        let text = serde_json::to_string(&set).unwrap();
        // JSON object member order follows the stored scan order, not
        // alphabetical order.
        assert!(text.find("zebra").unwrap() < text.find("apple").unwrap());
        assert!(text.find("apple").unwrap() < text.find("mango").unwrap());

        let restored: RuleSet = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, set);
        let words: Vec<&str> = restored.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn insert_rejects_duplicate_word() {
        let mut set = RuleSet::default();
        assert!(set.insert(Rule::new("x", vec![RuleFlag::Delete])));
        assert!(!set.insert(Rule::new("x", vec![RuleFlag::Whole])));
        assert_eq!(set.get("x").unwrap().flags, vec![RuleFlag::Delete]);
    }

    #[test]
    fn document_preserves_unknown_fields() {
        let text = r#"{
            "_id": "automod",
            "bannedWords": { "spam": ["delete"] },
            "memberNotes": { "42": "repeat offender" }
        }"#;

        let doc: AutoModDocument = serde_json::from_str(text).unwrap();
        assert!(doc.banned_words.contains("spam"));
        assert!(doc.extra.contains_key("memberNotes"));

        let rewritten = serde_json::to_string(&doc).unwrap();
        let reloaded: AutoModDocument = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn format_rules_lists_words_with_flags() {
        let rules = vec![
            Rule::new("spam", vec![RuleFlag::Delete]),
            Rule::new("cat", vec![RuleFlag::Whole, RuleFlag::Case]),
            Rule::new("plain", vec![]),
        ];

        assert_eq!(format_rules(&rules), "spam: delete\ncat: whole case\nplain: ");
        assert_eq!(format_rules(&[]), "");
    }
}
