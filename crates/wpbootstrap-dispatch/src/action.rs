//! Actions: optional per-view parameter pre-processing.
//!
//! An action runs before its view renders. It receives the caller's
//! parameters and returns the parameters the view will actually see; the
//! originals are discarded. Views without an action receive the caller's
//! parameters unchanged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::BoxError;

/// The action function signature.
pub type Action = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;

/// Creates an action from a closure.
pub fn from_fn<F>(f: F) -> Action
where
    F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Actions keyed by view name (`Admin_Options`, not `actionAdmin_Options`).
#[derive(Clone, Default)]
pub struct Actions {
    by_view: HashMap<String, Action>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the action for `view`, replacing any previous one.
    pub fn insert(&mut self, view: impl Into<String>, action: Action) {
        self.by_view.insert(view.into(), action);
    }

    pub fn get(&self, view: &str) -> Option<&Action> {
        self.by_view.get(view)
    }

    pub fn contains(&self, view: &str) -> bool {
        self.by_view.contains_key(view)
    }

    pub fn len(&self) -> usize {
        self.by_view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_view.is_empty()
    }

    /// Runs the action for `view` if one is registered, otherwise returns
    /// `parameters` unchanged.
    pub fn prepare(&self, view: &str, parameters: Value) -> Result<Value, BoxError> {
        match self.by_view.get(view) {
            Some(action) => {
                tracing::debug!(view, "running view action");
                action(parameters)
            }
            None => Ok(parameters),
        }
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut views: Vec<&str> = self.by_view.keys().map(String::as_str).collect();
        views.sort_unstable();
        f.debug_struct("Actions").field("views", &views).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_action_is_identity() {
        let actions = Actions::new();
        let params = json!({"x": 1});
        assert_eq!(actions.prepare("MyView", params.clone()).unwrap(), params);
    }

    #[test]
    fn test_action_replaces_parameters() {
        let mut actions = Actions::new();
        actions.insert("MyView", from_fn(|_| Ok(json!({"replaced": true}))));

        let out = actions.prepare("MyView", json!({"x": 1})).unwrap();
        assert_eq!(out, json!({"replaced": true}));
        assert!(actions.contains("MyView"));
        assert!(!actions.contains("Other"));
    }

    #[test]
    fn test_action_error_propagates() {
        let mut actions = Actions::new();
        actions.insert("MyView", from_fn(|_| Err("bad input".into())));

        let err = actions.prepare("MyView", Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
    }
}
