//! Parsing `render<Name>` / `call<Name>` method names.

use std::fmt;

use serde_json::Value;
use wpbootstrap_render::{checked_view_path, ucfirst};

/// What to do with a rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Write the output to the caller's output stream.
    Render,
    /// Return the output to the caller without emitting it.
    Call,
}

impl Verb {
    /// Method-name prefix for this verb.
    pub fn prefix(self) -> &'static str {
        match self {
            Verb::Render => "render",
            Verb::Call => "call",
        }
    }

    /// Splits a method name into its verb and the remainder, or `None` when
    /// the prefix is not recognised.
    pub fn split(method: &str) -> Option<(Verb, &str)> {
        [Verb::Render, Verb::Call]
            .into_iter()
            .find_map(|verb| method.strip_prefix(verb.prefix()).map(|rest| (verb, rest)))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A single dispatch request. Created at call time and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub verb: Verb,
    /// View name with its first character uppercased (`Admin_Options`).
    pub name: String,
    /// Caller-supplied parameters; `Value::Null` when absent.
    pub parameters: Value,
}

impl Invocation {
    pub fn new(verb: Verb, name: impl Into<String>, parameters: Value) -> Self {
        Self {
            verb,
            name: name.into(),
            parameters,
        }
    }

    /// Parses a method name such as `renderAdmin_Options` or `callMyView`.
    ///
    /// Returns `None` for any other prefix, and for a remainder that cannot
    /// name a view (see [`checked_view_path`]).
    pub fn parse(method: &str, parameters: Value) -> Option<Self> {
        let (verb, rest) = Verb::split(method)?;
        let name = ucfirst(rest);
        checked_view_path(&name)?;
        Some(Self::new(verb, name, parameters))
    }

    /// The action method name conventionally associated with this view.
    pub fn action_name(&self) -> String {
        format!("action{}", self.name)
    }
}
