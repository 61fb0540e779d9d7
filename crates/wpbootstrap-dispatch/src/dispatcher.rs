//! The view dispatcher.
//!
//! # Pipeline
//!
//! ```text
//! "renderAdmin_Options", params
//!   → parse verb and name   (UnsupportedOperation, no filesystem access)
//!   → derive path           admin/options.jinja
//!   → existence + override  (ViewNotFound; theme copy wins silently; the
//!                            only two filesystem probes)
//!   → action                (replaces params when registered)
//!   → scope binding         (object keys → variables)
//!   → template engine
//!   → Render: write to out  /  Call: return the string
//! ```

use std::fmt;
use std::io::Write;

use serde_json::Value;
use wpbootstrap_render::{
    MiniJinjaEngine, RenderScope, ResolvedView, TemplateEngine, View, ViewResolver,
};

use crate::action::{self, Action, Actions};
use crate::error::{BoxError, DispatchError};
use crate::invocation::{Invocation, Verb};

/// Resolves and renders views for one plugin.
///
/// # Example
///
/// ```rust,ignore
/// use wpbootstrap_dispatch::ViewDispatcher;
/// use serde_json::json;
///
/// let views = ViewDispatcher::builder("acme", "/srv/plugins/acme/view")
///     .override_root("/srv/themes/site/view/acme")
///     .action("Admin_Options", |mut params| {
///         params["saved"] = json!(true);
///         Ok(params)
///     })
///     .build();
///
/// let html = views.call("Admin_Options", json!({"title": "Settings"}))?;
/// views.handle("renderMyView", json!(null), &mut std::io::stdout())?;
/// ```
pub struct ViewDispatcher {
    plugin: String,
    resolver: ViewResolver,
    engine: Box<dyn TemplateEngine>,
    actions: Actions,
}

impl ViewDispatcher {
    /// Starts building a dispatcher for `plugin` with views under `view_root`.
    pub fn builder(
        plugin: impl Into<String>,
        view_root: impl Into<std::path::PathBuf>,
    ) -> ViewDispatcherBuilder {
        ViewDispatcherBuilder::new(plugin.into(), ViewResolver::new(view_root))
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn resolver(&self) -> &ViewResolver {
        &self.resolver
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Dispatches a `render<Name>` or `call<Name>` method.
    ///
    /// `Render` writes to `out` and returns `None`; `Call` returns the output
    /// and leaves `out` untouched.
    pub fn handle<W: Write + ?Sized>(
        &self,
        method: &str,
        parameters: Value,
        out: &mut W,
    ) -> Result<Option<String>, DispatchError> {
        let invocation = Invocation::parse(method, parameters).ok_or_else(|| {
            DispatchError::UnsupportedOperation {
                method: method.to_string(),
                plugin: self.plugin.clone(),
            }
        })?;
        self.dispatch(invocation, out)
    }

    /// Runs an already parsed invocation.
    pub fn dispatch<W: Write + ?Sized>(
        &self,
        invocation: Invocation,
        out: &mut W,
    ) -> Result<Option<String>, DispatchError> {
        let output = self.generate(&invocation.name, invocation.parameters)?;
        match invocation.verb {
            Verb::Render => {
                out.write_all(output.as_bytes())?;
                out.flush()?;
                Ok(None)
            }
            Verb::Call => Ok(Some(output)),
        }
    }

    /// Renders `name` and returns the output.
    pub fn call(&self, name: &str, parameters: Value) -> Result<String, DispatchError> {
        self.generate(name, parameters)
    }

    /// Renders `name` to standard output.
    pub fn render(&self, name: &str, parameters: Value) -> Result<(), DispatchError> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.render_to(name, parameters, &mut lock)
    }

    /// Renders `name` into `out`.
    pub fn render_to<W: Write + ?Sized>(
        &self,
        name: &str,
        parameters: Value,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        self.dispatch(Invocation::new(Verb::Render, name, parameters), out)
            .map(|_| ())
    }

    /// Resolves the file for `name` without rendering it.
    pub fn resolve(&self, name: &str) -> Result<ResolvedView, DispatchError> {
        Ok(self.resolver.resolve(name)?)
    }

    fn generate(&self, name: &str, parameters: Value) -> Result<String, DispatchError> {
        let resolved = self.resolve(name)?;

        let parameters =
            self.actions
                .prepare(name, parameters)
                .map_err(|source| DispatchError::Action {
                    view: name.to_string(),
                    source,
                })?;

        let scope = RenderScope::from_parameters(parameters);
        let view = View::from_resolved(resolved).with_scope(scope);
        Ok(view.render(self.engine.as_ref())?)
    }
}

impl fmt::Debug for ViewDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewDispatcher")
            .field("plugin", &self.plugin)
            .field("resolver", &self.resolver)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ViewDispatcher`].
pub struct ViewDispatcherBuilder {
    plugin: String,
    resolver: ViewResolver,
    engine: Option<Box<dyn TemplateEngine>>,
    actions: Actions,
}

impl ViewDispatcherBuilder {
    fn new(plugin: String, resolver: ViewResolver) -> Self {
        Self {
            plugin,
            resolver,
            engine: None,
            actions: Actions::new(),
        }
    }

    /// Directory whose files shadow same-named plugin views.
    pub fn override_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.resolver = self.resolver.with_override_root(root);
        self
    }

    /// View file extension; defaults to `jinja`.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_extension(extension);
        self
    }

    /// Template engine; defaults to [`MiniJinjaEngine`].
    pub fn engine(mut self, engine: Box<dyn TemplateEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Registers the action run before `view` renders.
    pub fn action<F>(mut self, view: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.actions.insert(view, action::from_fn(f));
        self
    }

    /// Registers a pre-built action.
    pub fn action_fn(mut self, view: impl Into<String>, action: Action) -> Self {
        self.actions.insert(view, action);
        self
    }

    pub fn build(self) -> ViewDispatcher {
        ViewDispatcher {
            plugin: self.plugin,
            resolver: self.resolver,
            engine: self
                .engine
                .unwrap_or_else(|| Box::new(MiniJinjaEngine::new())),
            actions: self.actions,
        }
    }
}
