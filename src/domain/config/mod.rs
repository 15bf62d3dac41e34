//! Config domain: the backend's runtime configuration and a local working copy.
//!
//! The configuration is an open-ended nested JSON object (`api.paper`,
//! `strategy.market_maker.quote_size`, `risk.max_drawdown_pct`, ...). The
//! SDK does not pin its schema; it offers dotted-path access instead.

#[cfg(feature = "http")]
pub mod client;

use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── ConfigSnapshot ──────────────────────────────────────────────────────────

/// One complete configuration object as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSnapshot(Map<String, Value>);

impl ConfigSnapshot {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Accept both a bare config object and the `{ "cfg": {...} }` envelope.
    pub fn from_response(value: Value) -> Result<Self, SdkError> {
        match value {
            Value::Object(mut map) => match map.remove("cfg") {
                Some(Value::Object(cfg)) => Ok(Self(cfg)),
                Some(other) => {
                    map.insert("cfg".to_string(), other);
                    Ok(Self(map))
                }
                None => Ok(Self(map)),
            },
            Value::Null => Ok(Self::default()),
            other => Err(SdkError::Validation(format!(
                "config must be a JSON object, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// Value at a dotted path (`strategy.market_maker.symbol`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = self.0.get(parts.next()?)?;
        parts.try_fold(first, |current, key| current.as_object()?.get(key))
    }

    /// `api.paper`: whether the bot trades against the paper engine.
    pub fn paper(&self) -> Option<bool> {
        self.get("api.paper").and_then(Value::as_bool)
    }

    /// `strategy.name`.
    pub fn strategy_name(&self) -> Option<&str> {
        self.get("strategy.name").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), SdkError> {
        let keys: Vec<&str> = path.split('.').collect();
        if keys.iter().any(|k| k.is_empty()) {
            return Err(SdkError::Validation(format!("invalid config path: {:?}", path)));
        }

        let (last, parents) = keys
            .split_last()
            .ok_or_else(|| SdkError::Validation("empty config path".into()))?;

        let mut current = &mut self.0;
        for key in parents {
            let slot = current
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match slot {
                Value::Object(map) => map,
                other => {
                    return Err(SdkError::Validation(format!(
                        "config path {:?} crosses a {} at {:?}",
                        path,
                        kind_of(other),
                        key
                    )))
                }
            };
        }
        current.insert(last.to_string(), value);
        Ok(())
    }
}

impl From<Map<String, Value>> for ConfigSnapshot {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── ConfigDraft ─────────────────────────────────────────────────────────────

/// The single client-side working copy of the configuration.
///
/// Edits mutate the working copy; `replace` (reload, restore, default)
/// swaps both the baseline and the working copy wholesale.
#[derive(Debug, Clone, Default)]
pub struct ConfigDraft {
    baseline: ConfigSnapshot,
    working: ConfigSnapshot,
}

impl ConfigDraft {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            baseline: snapshot.clone(),
            working: snapshot,
        }
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.working.get(path)
    }

    /// Set a value at a dotted path, creating intermediate objects.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), SdkError> {
        self.working.set(path, value.into())
    }

    /// Whether the working copy differs from the last loaded/saved baseline.
    pub fn is_dirty(&self) -> bool {
        self.working != self.baseline
    }

    /// Discard local edits.
    pub fn reset(&mut self) {
        self.working = self.baseline.clone();
    }

    /// Replace everything with a freshly fetched snapshot.
    pub fn replace(&mut self, snapshot: ConfigSnapshot) {
        self.baseline = snapshot.clone();
        self.working = snapshot;
    }

    /// Record that the working copy was persisted.
    pub fn mark_saved(&mut self) {
        self.baseline = self.working.clone();
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.working
    }

    pub fn baseline(&self) -> &ConfigSnapshot {
        &self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(v: Value) -> ConfigSnapshot {
        ConfigSnapshot::from_response(v).unwrap()
    }

    #[test]
    fn test_unwraps_cfg_envelope() {
        let snap = snapshot(json!({"ok": true, "cfg": {"api": {"paper": true}}}));
        assert_eq!(snap.paper(), Some(true));
        assert!(snap.get("ok").is_none());
    }

    #[test]
    fn test_bare_config_accepted() {
        let snap = snapshot(json!({"strategy": {"name": "market_maker"}}));
        assert_eq!(snap.strategy_name(), Some("market_maker"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ConfigSnapshot::from_response(json!([1, 2])).is_err());
        assert!(snapshot(Value::Null).is_empty());
    }

    #[test]
    fn test_draft_set_creates_path_and_tracks_dirty() {
        let mut draft = ConfigDraft::new(snapshot(json!({"risk": {"max_drawdown_pct": 5}})));
        assert!(!draft.is_dirty());
        draft.set("risk.max_drawdown_pct", 7).unwrap();
        draft.set("scanner.score.w_spread", 0.5).unwrap();
        assert!(draft.is_dirty());
        assert_eq!(draft.get("risk.max_drawdown_pct"), Some(&json!(7)));
        assert_eq!(draft.get("scanner.score.w_spread"), Some(&json!(0.5)));
        draft.reset();
        assert!(!draft.is_dirty());
        assert!(draft.get("scanner").is_none());
    }

    #[test]
    fn test_draft_set_through_scalar_fails() {
        let mut draft = ConfigDraft::new(snapshot(json!({"api": {"paper": true}})));
        assert!(draft.set("api.paper.deep", 1).is_err());
        assert!(draft.set("api..x", 1).is_err());
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_replace_and_mark_saved() {
        let mut draft = ConfigDraft::default();
        draft.set("ui.theme", "dark").unwrap();
        draft.mark_saved();
        assert!(!draft.is_dirty());
        draft.replace(snapshot(json!({"ui": {"theme": "light"}})));
        assert_eq!(draft.get("ui.theme"), Some(&json!("light")));
        assert_eq!(draft.baseline(), draft.snapshot());
    }
}
