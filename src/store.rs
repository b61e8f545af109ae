//! Working configuration with dirty tracking and save.
//!
//! The store owns two values: the *current* configuration the user is
//! editing and the *baseline* it was loaded from (or last saved as). Dirty
//! state is a deep structural comparison between the two.
//!
//! # Save lifecycle
//!
//! ```text
//! begin_save ──► snapshot taken, saving = true
//!     │              (edits may continue; they are not part of the snapshot)
//!     ├── complete_save ──► baseline = snapshot, saving = false
//!     └── abort_save    ──► baseline unchanged, saving = false
//! ```
//!
//! [`ConfigStore::save`] drives both phases around a [`Persist`] call. A
//! second save while one is in flight is refused with
//! [`StoreError::SaveInFlight`]. There is no retry and no timeout; both
//! belong to the persistence side.

use std::future::Future;

use serde_json::Value;
use thiserror::Error;

use crate::path;

// ============================================================================
// Persistence boundary
// ============================================================================

/// External collaborator that stores a configuration.
pub trait Persist {
    type Error: std::error::Error + Send + Sync + 'static;

    fn persist(&self, config: &Value) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Errors surfaced by [`ConfigStore::save`].
#[derive(Debug, Error)]
pub enum StoreError<E> {
    #[error("a save is already in progress")]
    SaveInFlight,

    /// The persistence collaborator failed; its error is passed through.
    #[error(transparent)]
    Persist(E),
}

/// Snapshot handed out by [`ConfigStore::begin_save`].
#[derive(Debug)]
#[must_use = "a pending save must be completed or aborted"]
pub struct PendingSave {
    snapshot: Value,
}

impl PendingSave {
    /// The configuration being saved.
    pub fn snapshot(&self) -> &Value {
        &self.snapshot
    }
}

// ============================================================================
// ConfigStore
// ============================================================================

#[derive(Debug, Clone)]
pub struct ConfigStore {
    current: Value,
    baseline: Value,
    saving: bool,
}

impl ConfigStore {
    /// Start editing an existing configuration; it becomes the baseline.
    pub fn load(existing: Value) -> Self {
        Self {
            baseline: existing.clone(),
            current: existing,
            saving: false,
        }
    }

    pub fn current(&self) -> &Value {
        &self.current
    }

    pub fn baseline(&self) -> &Value {
        &self.baseline
    }

    pub fn get_field(&self, path: &str) -> Option<&Value> {
        path::get(&self.current, path)
    }

    /// Write a field. No validation happens here.
    pub fn set_field(&mut self, path: &str, value: Value) {
        path::set_in_place(&mut self.current, path, value);
    }

    pub fn is_dirty(&self) -> bool {
        !deep_equal(&self.current, &self.baseline)
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Take a snapshot of the current value for saving.
    pub fn begin_save(&mut self) -> Result<PendingSave, StoreError<std::convert::Infallible>> {
        if self.saving {
            return Err(StoreError::SaveInFlight);
        }
        self.saving = true;
        Ok(PendingSave {
            snapshot: self.current.clone(),
        })
    }

    /// The snapshot was stored: it becomes the new baseline.
    ///
    /// Edits made after `begin_save` are compared against it and stay dirty.
    pub fn complete_save(&mut self, pending: PendingSave) {
        self.baseline = pending.snapshot;
        self.saving = false;
    }

    /// The snapshot was not stored; the baseline is unchanged.
    pub fn abort_save(&mut self, pending: PendingSave) {
        drop(pending);
        self.saving = false;
    }

    /// Persist the current configuration and adopt it as the baseline.
    pub async fn save<P: Persist>(&mut self, persist: &P) -> Result<(), StoreError<P::Error>> {
        let pending = self
            .begin_save()
            .map_err(|_| StoreError::SaveInFlight)?;

        match persist.persist(pending.snapshot()).await {
            Ok(()) => {
                self.complete_save(pending);
                Ok(())
            }
            Err(err) => {
                self.abort_save(pending);
                Err(StoreError::Persist(err))
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::load(Value::Object(Default::default()))
    }
}

// ============================================================================
// Structural equality
// ============================================================================

/// Deep structural equality used for dirty checks.
///
/// Objects must have the same key set with equal values (key order is
/// ignored). Arrays compare element by element and are order sensitive.
/// Numbers compare by numeric value, so `1` equals `1.0`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, v)| y.get(key).is_some_and(|w| deep_equal(v, w)))
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(v, w)| deep_equal(v, w))
        }
        (Value::Number(x), Value::Number(y)) => {
            x == y
                || matches!((x.as_f64(), y.as_f64()), (Some(p), Some(q)) if p == q)
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        saved: Mutex<Vec<Value>>,
    }

    impl Persist for Recorder {
        type Error = std::io::Error;

        async fn persist(&self, config: &Value) -> Result<(), Self::Error> {
            self.saved.lock().push(config.clone());
            Ok(())
        }
    }

    struct Failing;

    impl Persist for Failing {
        type Error = std::io::Error;

        async fn persist(&self, _config: &Value) -> Result<(), Self::Error> {
            Err(std::io::Error::other("backend unavailable"))
        }
    }

    #[test]
    fn test_clean_after_load() {
        let store = ConfigStore::load(json!({"siteName": "Acme"}));
        assert!(!store.is_dirty());
        assert!(!store.is_saving());
    }

    #[test]
    fn test_dirty_after_change() {
        let mut store = ConfigStore::load(json!({"siteName": "Acme"}));
        store.set_field("siteName", json!("Globex"));
        assert!(store.is_dirty());
        assert_eq!(store.get_field("siteName"), Some(&json!("Globex")));
    }

    #[test]
    fn test_same_value_stays_clean() {
        let mut store = ConfigStore::load(json!({"a": {"b": [1, 2]}, "n": 1}));
        store.set_field("a.b", json!([1, 2]));
        store.set_field("n", json!(1.0));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_change_back_is_clean() {
        let mut store = ConfigStore::load(json!({"flag": false}));
        store.set_field("flag", json!(true));
        assert!(store.is_dirty());
        store.set_field("flag", json!(false));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_nested_write_creates_path() {
        let mut store = ConfigStore::default();
        store.set_field("checkout.payment.enabled", json!(true));
        assert_eq!(
            store.current(),
            &json!({"checkout": {"payment": {"enabled": true}}})
        );
        assert!(store.is_dirty());
    }

    #[tokio::test]
    async fn test_save_resets_baseline() {
        let recorder = Recorder::default();
        let mut store = ConfigStore::load(json!({"siteName": "Acme"}));
        store.set_field("primaryColor", json!("#fff"));

        store.save(&recorder).await.unwrap();

        assert!(!store.is_dirty());
        assert!(!store.is_saving());
        assert_eq!(store.baseline(), &json!({"siteName": "Acme", "primaryColor": "#fff"}));
        assert_eq!(recorder.saved.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let mut store = ConfigStore::load(json!({}));
        store.set_field("a", json!(1));

        let err = store.save(&Failing).await.unwrap_err();
        assert!(matches!(err, StoreError::Persist(_)));
        assert_eq!(err.to_string(), "backend unavailable");
        assert!(store.is_dirty());
        assert!(!store.is_saving());
    }

    #[test]
    fn test_edits_during_save_stay_dirty() {
        let mut store = ConfigStore::load(json!({"a": 1}));
        store.set_field("a", json!(2));

        let pending = store.begin_save().unwrap();
        store.set_field("a", json!(3));
        assert_eq!(pending.snapshot(), &json!({"a": 2}));

        store.complete_save(pending);
        assert_eq!(store.baseline(), &json!({"a": 2}));
        assert!(store.is_dirty());
    }

    #[test]
    fn test_reentrant_save_refused() {
        let mut store = ConfigStore::default();
        let pending = store.begin_save().unwrap();
        assert!(store.is_saving());
        assert!(matches!(store.begin_save(), Err(StoreError::SaveInFlight)));

        store.abort_save(pending);
        assert!(!store.is_saving());
        let again = store.begin_save().unwrap();
        store.complete_save(again);
    }

    #[tokio::test]
    async fn test_save_while_pending_is_refused() {
        let recorder = Recorder::default();
        let mut store = ConfigStore::default();
        let pending = store.begin_save().unwrap();

        let err = store.save(&recorder).await.unwrap_err();
        assert!(matches!(err, StoreError::SaveInFlight));
        assert!(recorder.saved.lock().is_empty());
        store.abort_save(pending);
    }

    #[test]
    fn test_deep_equal_rules() {
        assert!(deep_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": null})));
        assert!(!deep_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!deep_equal(&json!([1]), &json!([1, 1])));
        assert!(deep_equal(&json!(2), &json!(2.0)));
        assert!(!deep_equal(&json!("1"), &json!(1)));
        assert!(deep_equal(&json!(null), &json!(null)));
        assert!(!deep_equal(&json!(null), &json!({})));
    }
}
