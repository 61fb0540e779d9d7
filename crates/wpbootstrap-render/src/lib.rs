//! # wpbootstrap-render - Convention-Based View Rendering
//!
//! `wpbootstrap-render` turns a view *name* into a template file, binds
//! parameters into a render scope, and executes the template.
//!
//! This crate is the rendering foundation for the `wpbootstrap` plugin helper
//! layer, but can be used on its own wherever views live in a directory tree
//! named after their identifiers.
//!
//! ## Core Concepts
//!
//! - [`naming`]: UpperCamelCase view names to relative paths (`Admin_Options` → `admin/options.jinja`)
//! - [`ViewResolver`]: Primary view root plus an optional theme override root
//! - [`RenderScope`]: Flat variable bindings owned by one render
//! - [`TemplateEngine`]: The file-execution primitive, [`MiniJinjaEngine`] by default
//! - [`View`]: A resolved file plus its bindings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wpbootstrap_render::{MiniJinjaEngine, RenderScope, View, ViewResolver};
//! use serde_json::json;
//!
//! let resolver = ViewResolver::new("/srv/plugins/acme/view")
//!     .with_override_root("/srv/themes/site/view/acme");
//!
//! let resolved = resolver.resolve("Admin_Options")?;
//! let scope = RenderScope::from_parameters(json!({"title": "Settings"}));
//! let html = View::new(resolved.template_path)?
//!     .with_scope(scope)
//!     .render(&MiniJinjaEngine::new())?;
//! ```

pub mod engine;
mod error;
pub mod naming;
pub mod resolve;
pub mod scope;
pub mod view;

pub use engine::{register_filters, MiniJinjaEngine, TemplateEngine};
pub use error::RenderError;
pub use naming::{
    checked_view_path, is_view_name, ucfirst, view_file, view_path, DEFAULT_EXTENSION,
};
pub use resolve::{ResolvedView, ViewResolver};
pub use scope::RenderScope;
pub use view::View;
