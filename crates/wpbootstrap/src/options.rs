//! Namespaced options and version bookkeeping.
//!
//! Plugins store options as `plugin-<name>-<option>` and themes as
//! `theme-<name>-<option>`, so two extensions never collide in the host's
//! shared option table.

use serde_json::Value;

use crate::host::OptionStore;

/// Option under which the installed version is recorded.
pub const VERSION_OPTION: &str = "version";

/// Version assumed when nothing has been recorded yet.
pub const INITIAL_VERSION: &str = "0";

/// Which kind of extension owns a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Plugin,
    Theme,
}

impl Scope {
    fn prefix(self) -> &'static str {
        match self {
            Scope::Plugin => "plugin",
            Scope::Theme => "theme",
        }
    }
}

/// Key prefix for one extension's options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionNamespace {
    prefix: String,
}

impl OptionNamespace {
    pub fn new(scope: Scope, name: &str) -> Self {
        Self {
            prefix: format!("{}-{}-", scope.prefix(), name),
        }
    }

    /// Full host key for `option`.
    pub fn key(&self, option: &str) -> String {
        format!("{}{}", self.prefix, option)
    }

    /// Reads `option`, falling back to `default` when unset.
    pub fn get<S: OptionStore + ?Sized>(&self, store: &S, option: &str, default: Value) -> Value {
        store.get_option(&self.key(option)).unwrap_or(default)
    }

    pub fn set<S: OptionStore + ?Sized>(&self, store: &mut S, option: &str, value: Value) {
        store.set_option(&self.key(option), value);
    }

    /// The recorded version, or [`INITIAL_VERSION`].
    pub fn recorded_version<S: OptionStore + ?Sized>(&self, store: &S) -> String {
        match self.get(store, VERSION_OPTION, Value::from(INITIAL_VERSION)) {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }
}

/// Shallow-merges `attributes` over `defaults`.
///
/// - Neither is an object: an empty object.
/// - Only one is an object: that one.
/// - Both are objects: keys from `attributes` win.
pub fn replace_defaults(defaults: Value, attributes: Value) -> Value {
    match (defaults, attributes) {
        (Value::Object(mut base), Value::Object(overrides)) => {
            base.extend(overrides);
            Value::Object(base)
        }
        (base @ Value::Object(_), _) => base,
        (_, overrides @ Value::Object(_)) => overrides,
        _ => Value::Object(serde_json::Map::new()),
    }
}
