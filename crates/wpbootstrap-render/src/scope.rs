//! Variable bindings visible to a view while it renders.
//!
//! A [`RenderScope`] is built from the parameters handed to a dispatch call
//! (after any action has transformed them) and is owned by exactly one render.
//! Templates receive it by value, so nothing a template does can leak back
//! into the caller's state.

use serde::Serialize;
use serde_json::{Map, Value};

/// Flat name → value bindings for a single render.
///
/// Insertion order is preserved, so a template iterating over its scope sees
/// variables in the order the parameters listed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderScope {
    vars: Map<String, Value>,
}

impl RenderScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens parameters into a scope.
    ///
    /// - Objects contribute one binding per key.
    /// - Arrays contribute one binding per element, keyed by index.
    /// - Scalars and `null` produce an empty scope.
    pub fn from_parameters(parameters: Value) -> Self {
        let vars = match parameters {
            Value::Object(map) => map,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Map::new(),
        };
        Self { vars }
    }

    /// Binds a variable, replacing any previous binding of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Returns the value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates over bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consumes the scope, returning its bindings as a JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.vars)
    }
}

impl From<Value> for RenderScope {
    fn from(parameters: Value) -> Self {
        Self::from_parameters(parameters)
    }
}
