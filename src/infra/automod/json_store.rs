use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::automod::{AutoModDocument, AutoModError, RuleStore, MODULE_ID};

/// JSON file store for the automod document. One file per module id, read
/// whole on load and replaced whole on every save (upsert semantics: the
/// file is created on the first save).
pub struct JsonRuleStore {
    path: PathBuf,
}

impl JsonRuleStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Conventional location: `<data_dir>/<module id>.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(format!("{MODULE_ID}.json")))
    }
}

#[async_trait]
impl RuleStore for JsonRuleStore {
    async fn load(&self) -> Result<Option<AutoModDocument>, AutoModError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|e| AutoModError::Store(e.to_string()))?;

        let document: AutoModDocument =
            serde_json::from_str(&text).map_err(|e| AutoModError::Store(e.to_string()))?;
        Ok(Some(document))
    }

    async fn save(&self, document: &AutoModDocument) -> Result<(), AutoModError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AutoModError::Store(e.to_string()))?;
        }

        let text = serde_json::to_string_pretty(document)
            .map_err(|e| AutoModError::Store(e.to_string()))?;
        fs::write(&self.path, text)
            .await
            .map_err(|e| AutoModError::Store(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automod::{Rule, RuleFlag};
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        let store = JsonRuleStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        let mut document = AutoModDocument::default();
        document.banned_words.insert(Rule::new("spam", vec![RuleFlag::Delete]));
        document
            .banned_words
            .insert(Rule::new("cat", vec![RuleFlag::Whole, RuleFlag::Case]));

        let store = JsonRuleStore::new(&path);
        store.save(&document).await.unwrap();

        // Reload from file with a fresh store instance.
        let store2 = JsonRuleStore::new(&path);
        let restored = store2.load().await.unwrap().unwrap();
        assert_eq!(restored, document);

        let words: Vec<String> = restored
            .banned_words
            .iter()
            .map(|r| r.word.clone())
            .collect();
        assert_eq!(words, vec!["spam", "cat"]);
    }

    #[tokio::test]
    async fn test_document_shape_on_disk() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        let mut document = AutoModDocument::default();
        document.banned_words.insert(Rule::new("spam", vec![RuleFlag::Delete]));

        let store = JsonRuleStore::new(&path);
        store.save(&document).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["_id"], "automod");
        assert_eq!(raw["bannedWords"]["spam"][0], "delete");
    }

    #[tokio::test]
    async fn test_unmodeled_fields_survive_a_save() {
        let tmp = NamedTempFile::new().unwrap();
        let path = tmp.path().to_owned();
        drop(tmp);

        std::fs::write(
            &path,
            r#"{ "_id": "automod", "bannedWords": {}, "memberNotes": { "42": "note" } }"#,
        )
        .unwrap();

        let store = JsonRuleStore::new(&path);
        let mut document = store.load().await.unwrap().unwrap();
        document.banned_words.insert(Rule::new("spam", vec![RuleFlag::Delete]));
        store.save(&document).await.unwrap();

        let restored = store.load().await.unwrap().unwrap();
        assert!(restored.banned_words.contains("spam"));
        assert_eq!(restored.extra["memberNotes"]["42"], "note");
    }
}
