//! Layered view file resolution.
//!
//! A view name resolves against two roots:
//!
//! ```text
//! plugin-root/<view-dir>/<derived>.<ext>          (primary, must exist)
//! theme-root/view/<plugin-name>/<derived>.<ext>   (override, optional)
//! ```
//!
//! The primary file must exist even when an override is present; a view the
//! plugin never shipped cannot be conjured up by a theme. When the override
//! exists it replaces the primary unconditionally.

use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::naming::{self, DEFAULT_EXTENSION, PATH_SEPARATOR};

/// A view name resolved to a concrete template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    /// Absolute (or root-relative) path of the file to render.
    pub template_path: PathBuf,
    /// Derived path relative to the view roots, e.g. `admin/options.jinja`.
    pub relative_path: String,
    /// True when a theme-level file shadows the plugin's own.
    pub is_override: bool,
}

/// Resolves view names to files under a plugin view root and an optional
/// theme override root.
#[derive(Debug, Clone)]
pub struct ViewResolver {
    view_root: PathBuf,
    override_root: Option<PathBuf>,
    extension: String,
}

impl ViewResolver {
    /// Creates a resolver for views under `view_root` with the default extension.
    pub fn new(view_root: impl Into<PathBuf>) -> Self {
        Self {
            view_root: view_root.into(),
            override_root: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Sets the directory holding theme overrides for this plugin's views.
    pub fn with_override_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.override_root = Some(root.into());
        self
    }

    /// Sets the view file extension (with or without the leading dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn view_root(&self) -> &Path {
        &self.view_root
    }

    pub fn override_root(&self) -> Option<&Path> {
        self.override_root.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the primary file path a view name maps to, without touching
    /// the filesystem.
    pub fn primary_path(&self, name: &str) -> PathBuf {
        join_relative(&self.view_root, &naming::view_file(name, &self.extension))
    }

    /// Resolves a view name.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidViewName`], before touching the
    /// filesystem, when `name` cannot address a file under the view root, and
    /// [`RenderError::ViewNotFound`] with the primary path when the plugin does
    /// not ship the view.
    pub fn resolve(&self, name: &str) -> Result<ResolvedView, RenderError> {
        let relative_path = naming::checked_view_path(name)
            .map(|path| format!("{}.{}", path, self.extension))
            .ok_or_else(|| RenderError::InvalidViewName(name.to_string()))?;
        let primary = join_relative(&self.view_root, &relative_path);

        if !primary.is_file() {
            return Err(RenderError::ViewNotFound(primary));
        }

        if let Some(root) = &self.override_root {
            let candidate = join_relative(root, &relative_path);
            if candidate.is_file() {
                tracing::debug!(
                    view = name,
                    primary = %primary.display(),
                    theme = %candidate.display(),
                    "theme override shadows plugin view"
                );
                return Ok(ResolvedView {
                    template_path: candidate,
                    relative_path,
                    is_override: true,
                });
            }
        }

        Ok(ResolvedView {
            template_path: primary,
            relative_path,
            is_override: false,
        })
    }
}

/// Joins a `/`-separated relative path onto `root` using platform separators.
fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in relative.split(PATH_SEPARATOR).filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}
