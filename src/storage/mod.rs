// src/storage/mod.rs

pub mod file;
pub mod memory;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Directory prefix for quiz documents.
pub const QUIZ_PREFIX: &str = "quizzes";
/// Directory prefix for submission collections.
pub const SUBMISSIONS_PREFIX: &str = "submissions";

/// Errors raised by document store backends.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
    InvalidKey(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O error: {}", e),
            StoreError::Corrupt { key, source } => {
                write!(f, "corrupt document '{}': {}", key, source)
            }
            StoreError::InvalidKey(key) => write!(f, "invalid document key '{}'", key),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Corrupt { source, .. } => Some(source),
            StoreError::InvalidKey(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

/// Key-to-JSON-document store with load-all / overwrite-all semantics.
///
/// There are no partial updates and no transactions; the last writer wins.
/// Backends are injectable: file-backed in production, in-memory in tests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads the document stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Saves (overwrites) the whole document under `key`.
    async fn save(&self, key: &str, doc: &Value) -> Result<(), StoreError>;

    /// Removes the document under `key`. Returns whether it existed.
    async fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// Lists document keys directly under `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Typed load: decodes the stored JSON into `T`.
pub async fn fetch<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.load(key).await? {
        Some(value) => {
            let doc = serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                source: e,
            })?;
            Ok(Some(doc))
        }
        None => Ok(None),
    }
}

/// Typed save: encodes `doc` and overwrites the document under `key`.
pub async fn persist<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    doc: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(doc).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        source: e,
    })?;
    store.save(key, &value).await
}

static NON_SLUG: OnceLock<Regex> = OnceLock::new();

/// Reduces a quiz title to a filename-safe slug: lowercased, spaces to
/// underscores, everything outside `[a-z0-9_]` stripped.
fn slugify(title: &str) -> String {
    let re = NON_SLUG.get_or_init(|| Regex::new(r"[^a-z0-9_]").expect("static pattern"));
    re.replace_all(&title.replace(' ', "_").to_lowercase(), "")
        .into_owned()
}

/// Composite key locating a quiz's persisted documents.
///
/// A quiz is addressed externally by numeric id plus title; the slug is
/// derived once here so no call site concatenates or re-parses key strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizKey {
    id: i64,
    slug: String,
}

impl QuizKey {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            slug: slugify(title),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Key of the quiz document, e.g. `quizzes/3_algebra_basics`.
    pub fn quiz_doc(&self) -> String {
        format!("{}/{}_{}", QUIZ_PREFIX, self.id, self.slug)
    }

    /// Key of the submissions collection, e.g. `submissions/3_algebra_basics`.
    pub fn submissions_doc(&self) -> String {
        format!("{}/{}_{}", SUBMISSIONS_PREFIX, self.id, self.slug)
    }
}

/// Extracts the numeric quiz id from a stored key such as `quizzes/12_algebra`.
pub fn id_from_key(key: &str) -> Option<i64> {
    let name = key.rsplit('/').next()?;
    let (id, _) = name.split_once('_')?;
    id.parse().ok()
}

/// Hands out one async mutex per document key.
///
/// The store itself has no append primitive, so the submit path must
/// load-modify-save the whole submissions collection; taking the key's
/// lock around that cycle keeps concurrent submissions to the same quiz
/// from losing each other's records. Reads do not take the lock.
#[derive(Clone, Default)]
pub struct KeyLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_strips_and_lowercases() {
        assert_eq!(slugify("Algebra Basics"), "algebra_basics");
        assert_eq!(slugify("C++ & Rust!"), "c__rust");
        assert_eq!(slugify("already_safe_123"), "already_safe_123");
    }

    #[test]
    fn quiz_key_builds_both_documents() {
        let key = QuizKey::new(3, "Algebra Basics");
        assert_eq!(key.quiz_doc(), "quizzes/3_algebra_basics");
        assert_eq!(key.submissions_doc(), "submissions/3_algebra_basics");
        assert_eq!(key.id(), 3);
    }

    #[test]
    fn same_title_spelling_variants_share_a_key() {
        // Path segments arrive with arbitrary casing; the slug normalizes them.
        let a = QuizKey::new(7, "World History");
        let b = QuizKey::new(7, "world history");
        assert_eq!(a, b);
    }

    #[test]
    fn id_round_trips_through_key_names() {
        let key = QuizKey::new(12, "Algebra");
        assert_eq!(id_from_key(&key.quiz_doc()), Some(12));
        assert_eq!(id_from_key("quizzes/not_a_number"), None);
        assert_eq!(id_from_key("garbage"), None);
    }

    #[tokio::test]
    async fn key_locks_are_independent_per_key() {
        let locks = KeyLocks::new();
        let a = locks.acquire("submissions/1_a").await;
        // A different key must not block.
        let _b = locks.acquire("submissions/2_b").await;
        drop(a);
        let _a2 = locks.acquire("submissions/1_a").await;
    }
}
