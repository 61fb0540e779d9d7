//! A single view file bound to its variables.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::TemplateEngine;
use crate::error::RenderError;
use crate::resolve::ResolvedView;
use crate::scope::RenderScope;

/// A view script together with the variables it will see.
///
/// # Example
///
/// ```rust,ignore
/// let mut view = View::new("/plugins/acme/view/my-view.jinja")?;
/// view.set("message", "Some message here");
/// view.set("resultCount", 100);
/// let html = view.render(&MiniJinjaEngine::new())?;
/// ```
#[derive(Debug, Clone)]
pub struct View {
    path: PathBuf,
    scope: RenderScope,
}

impl View {
    /// Creates a view for the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ViewNotFound`] if `path` is not a regular file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RenderError> {
        let path = path.into();
        if !path.is_file() {
            return Err(RenderError::ViewNotFound(path));
        }
        Ok(Self {
            path,
            scope: RenderScope::new(),
        })
    }

    /// Creates a view for a file the resolver has already found, without
    /// probing the filesystem again.
    pub fn from_resolved(resolved: ResolvedView) -> Self {
        Self {
            path: resolved.template_path,
            scope: RenderScope::new(),
        }
    }

    /// Replaces the view's bindings with `scope`.
    pub fn with_scope(mut self, scope: RenderScope) -> Self {
        self.scope = scope;
        self
    }

    /// Binds a single variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scope.set(name, value);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scope(&self) -> &RenderScope {
        &self.scope
    }

    /// Renders the view, consuming its bindings.
    pub fn render(self, engine: &dyn TemplateEngine) -> Result<String, RenderError> {
        engine.render_file(&self.path, self.scope)
    }
}
