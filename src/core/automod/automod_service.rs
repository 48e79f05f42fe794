// Banned-word filter service - core business logic for the automod feature.
//
// This service handles:
// - Message evaluation against the rule set
// - Blacklist management (add / remove / list)
// - Write-through persistence after every mutation
//
// NO Discord dependencies here - just pure domain logic.

use super::automod_models::{AutoModDocument, MatchOutcome, Rule, RuleFlag};
use async_trait::async_trait;
use std::borrow::Cow;
use thiserror::Error;
use tokio::sync::RwLock;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum AutoModError {
    #[error("`{0}` is already blacklisted")]
    DuplicateRule(String),

    #[error("`{0}` is not blacklisted")]
    RuleNotFound(String),

    #[error("a banned word must not be empty")]
    EmptyWord,

    #[error("the blacklist has not finished loading yet")]
    NotReady,

    #[error("storage error: {0}")]
    Store(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting the automod document.
///
/// Models an opaque document collection: one document per module id, fetched
/// whole and replaced whole (upsert). No partial updates.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch the stored document, or `None` if it has never been saved.
    async fn load(&self) -> Result<Option<AutoModDocument>, AutoModError>;

    /// Replace the stored document with `document`, inserting it if absent.
    async fn save(&self, document: &AutoModDocument) -> Result<(), AutoModError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Engine lifecycle: `Uninitialized` until the one-time load completes, then
/// `Ready` for the rest of the process lifetime. Never transitions back.
enum CacheState {
    Uninitialized,
    Ready(AutoModDocument),
}

/// Banned-word filter engine. Owns the cached document; all mutations go
/// through the write lock and are persisted before the lock is released, so
/// saved snapshots can never interleave.
pub struct AutoModService<S: RuleStore> {
    store: S,
    cache: RwLock<CacheState>,
}

impl<S: RuleStore> AutoModService<S> {
    /// Create the service in the `Uninitialized` state. Call [`load`] once
    /// the transport layer reports it is connected.
    ///
    /// [`load`]: AutoModService::load
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: RwLock::new(CacheState::Uninitialized),
        }
    }

    /// One-time load of the persisted document. A missing document or an
    /// unreachable store both fall back to the default empty rule set; either
    /// way the engine ends up `Ready`. Later calls are no-ops.
    pub async fn load(&self) {
        let document = match self.store.load().await {
            Ok(Some(doc)) => doc,
            Ok(None) => AutoModDocument::default(),
            Err(e) => {
                tracing::warn!("Failed to load blacklist, starting empty: {e}");
                AutoModDocument::default()
            }
        };

        let mut cache = self.cache.write().await;
        if matches!(*cache, CacheState::Uninitialized) {
            tracing::info!(rules = document.banned_words.len(), "Blacklist loaded");
            *cache = CacheState::Ready(document);
        }
    }

    /// Add a banned word with its flags and persist the result.
    pub async fn add_rule(&self, word: &str, flags: Vec<RuleFlag>) -> Result<(), AutoModError> {
        if word.is_empty() {
            return Err(AutoModError::EmptyWord);
        }

        let mut cache = self.cache.write().await;
        let doc = match &mut *cache {
            CacheState::Ready(doc) => doc,
            CacheState::Uninitialized => return Err(AutoModError::NotReady),
        };

        if !doc.banned_words.insert(Rule::new(word, flags)) {
            return Err(AutoModError::DuplicateRule(word.to_string()));
        }

        self.store.save(doc).await
    }

    /// Remove a banned word and persist the result.
    pub async fn remove_rule(&self, word: &str) -> Result<(), AutoModError> {
        let mut cache = self.cache.write().await;
        let doc = match &mut *cache {
            CacheState::Ready(doc) => doc,
            CacheState::Uninitialized => return Err(AutoModError::NotReady),
        };

        if !doc.banned_words.remove(word) {
            return Err(AutoModError::RuleNotFound(word.to_string()));
        }

        self.store.save(doc).await
    }

    /// Snapshot of the rules in stored order. Never persists.
    pub async fn list_rules(&self) -> Result<Vec<Rule>, AutoModError> {
        let cache = self.cache.read().await;
        match &*cache {
            CacheState::Ready(doc) => Ok(doc.banned_words.iter().cloned().collect()),
            CacheState::Uninitialized => Err(AutoModError::NotReady),
        }
    }

    /// Evaluate message content against the rule set.
    ///
    /// Rules are scanned in stored order and the first structural match ends
    /// the scan; later rules are never consulted for this message, even if
    /// they would also match with different flags. Before [`load`] completes
    /// there are no rules to scan and the result is always `None`.
    ///
    /// [`load`]: AutoModService::load
    pub async fn check_message(&self, content: &str) -> Option<MatchOutcome> {
        let cache = self.cache.read().await;
        let doc = match &*cache {
            CacheState::Ready(doc) => doc,
            CacheState::Uninitialized => return None,
        };

        for rule in doc.banned_words.iter() {
            if rule_matches(rule, content) {
                return Some(MatchOutcome {
                    word: rule.word.clone(),
                    delete: rule.deletes(),
                });
            }
        }

        None
    }
}

/// Structural match test for one rule.
///
/// Without `case`, both sides are lower-cased first. With `whole`, the
/// content is split on single spaces and a token must equal the word exactly;
/// a word containing a space therefore never matches under `whole`. Without
/// `whole`, a plain substring test applies.
fn rule_matches(rule: &Rule, content: &str) -> bool {
    let (content, word): (Cow<'_, str>, Cow<'_, str>) = if rule.is_case_sensitive() {
        (Cow::Borrowed(content), Cow::Borrowed(rule.word.as_str()))
    } else {
        (
            Cow::Owned(content.to_lowercase()),
            Cow::Owned(rule.word.to_lowercase()),
        )
    };

    if rule.is_whole_word() {
        content.split(' ').any(|token| token == word.as_ref())
    } else {
        content.contains(word.as_ref())
    }
}

// ============================================================================
// TESTS
// ============================================================================
