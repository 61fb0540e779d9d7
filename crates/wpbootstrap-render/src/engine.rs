//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the host capability that
//! executes a view file against a [`RenderScope`] and captures its output. The
//! default implementation is [`MiniJinjaEngine`].

use std::path::{Path, PathBuf};

use minijinja::{Environment, UndefinedBehavior, Value};

use crate::error::RenderError;
use crate::scope::RenderScope;

/// Executes templates with a given variable scope and returns their output.
///
/// Implementations must not retain the scope after a call returns.
pub trait TemplateEngine: Send + Sync {
    /// Renders the template file at `path` with `scope` in effect.
    fn render_file(&self, path: &Path, scope: RenderScope) -> Result<String, RenderError>;

    /// Renders a template source string with `scope` in effect.
    fn render_str(&self, source: &str, scope: RenderScope) -> Result<String, RenderError>;
}

/// MiniJinja-based template engine.
///
/// View files are read from disk on every render, so edits show up without
/// restarting the host. Undefined variables render as empty strings.
///
/// # Example
///
/// ```rust
/// use wpbootstrap_render::{MiniJinjaEngine, RenderScope, TemplateEngine};
/// use serde_json::json;
///
/// let engine = MiniJinjaEngine::new();
/// let scope = RenderScope::from_parameters(json!({"name": "World"}));
/// let output = engine.render_str("Hello, {{ name }}!", scope).unwrap();
/// assert_eq!(output, "Hello, World!");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates a new MiniJinja engine with default filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        register_filters(&mut env);
        Self { env }
    }

    /// Creates an engine whose `{% include %}` and `{% extends %}` lookups are
    /// resolved relative to `root`.
    pub fn with_loader_root(root: impl Into<PathBuf>) -> Self {
        let mut engine = Self::new();
        engine.env.set_loader(minijinja::path_loader(root.into()));
        engine
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// Use this to register custom filters or functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_file(&self, path: &Path, scope: RenderScope) -> Result<String, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => RenderError::ViewNotFound(path.to_path_buf()),
            _ => RenderError::from(err),
        })?;
        let name = path.display().to_string();
        let ctx = Value::from_serialize(&scope);
        Ok(self.env.render_named_str(&name, &source, ctx)?)
    }

    fn render_str(&self, source: &str, scope: RenderScope) -> Result<String, RenderError> {
        let ctx = Value::from_serialize(&scope);
        Ok(self.env.render_str(source, ctx)?)
    }
}

/// Registers the default filters with a MiniJinja environment.
///
/// Called automatically by [`MiniJinjaEngine::new`].
pub fn register_filters(env: &mut Environment<'static>) {
    // Newline filter
    env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });

    // Attribute escaping for values interpolated inside HTML attributes
    env.add_filter("esc_attr", |value: String| -> String {
        value
            .replace('&', "&amp;")
            .replace('"', "&quot;")
            .replace('\'', "&#039;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    });
}
