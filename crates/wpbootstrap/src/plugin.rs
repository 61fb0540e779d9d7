//! Plugin base: views, hooks, options and version upgrades for one plugin.
//!
//! # Views
//!
//! Views live under `<base_dir>/<view_directory>/` and are addressed by
//! UpperCamelCase names, with underscores standing in for directory
//! separators:
//!
//! | Call | File |
//! |------|------|
//! | `plugin.call("MyView", params)` | `view/my-view.jinja` |
//! | `plugin.handle("renderAdmin_Options", params, out)` | `view/admin/options.jinja` |
//!
//! Keys of the parameter object become template variables. A theme can
//! replace any view by shipping `<theme>/view/<plugin-name>/<same path>`.
//!
//! # Actions
//!
//! An action registered for a view runs before it renders and returns the
//! parameters the view receives:
//!
//! ```rust,ignore
//! let plugin = PluginBuilder::new(config)
//!     .action("Admin_Options", |mut params| {
//!         params["saved"] = json!(true);
//!         Ok(params)
//!     })
//!     .build(host)?;
//! ```
//!
//! # Upgrades
//!
//! On construction the recorded `version` option is compared with the
//! configured version. When they differ the upgrade routine runs with the
//! recorded version and, if it succeeds, the configured version is recorded.

use std::io::Write;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use wpbootstrap_dispatch::{
    BoxError, Callback, DispatchError, HookError, Hooks, ViewDispatcher,
};
use wpbootstrap_render::{ResolvedView, TemplateEngine};

use crate::config::{ConfigError, PluginConfig};
use crate::host::Host;
use crate::options::{OptionNamespace, Scope, VERSION_OPTION};

/// Upgrade routine: `(recorded_version, new_version)`.
pub type UpgradeFn = Box<dyn Fn(&str, &str) -> Result<(), BoxError>>;

/// Errors raised while setting up a plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("upgrade of {name} from {from} to {to} failed")]
    Upgrade {
        name: String,
        from: String,
        to: String,
        #[source]
        source: BoxError,
    },
}

/// A configured plugin bound to its host.
pub struct Plugin<H: Host> {
    config: PluginConfig,
    host: H,
    views: ViewDispatcher,
    options: OptionNamespace,
}

impl<H: Host> Plugin<H> {
    /// Creates a plugin with no actions and no upgrade routine.
    pub fn new(config: PluginConfig, host: H) -> Result<Self, PluginError> {
        PluginBuilder::new(config).build(host)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn view_directory(&self) -> &str {
        &self.config.view_directory
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Name of the directory containing the plugin.
    pub fn base_directory(&self) -> String {
        base_directory_name(&self.config.base_dir)
    }

    /// Admin page URL for the plugin.
    pub fn admin_url(&self) -> String {
        self.host.admin_url(&self.config.name)
    }

    /// Public URL of `path` inside the plugin directory, for images and
    /// scripts.
    pub fn base_url(&self, path: &str) -> String {
        self.host.plugins_url(path, &self.base_directory())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn views(&self) -> &ViewDispatcher {
        &self.views
    }

    /// Registers further hooks on the host.
    pub fn hooks(&mut self) -> Hooks<'_, H> {
        Hooks::new(&mut self.host)
    }

    /// Dispatches a `render<Name>` / `call<Name>` method.
    pub fn handle<W: Write + ?Sized>(
        &self,
        method: &str,
        parameters: Value,
        out: &mut W,
    ) -> Result<Option<String>, DispatchError> {
        self.views.handle(method, parameters, out)
    }

    /// Renders view `name` to standard output.
    pub fn render(&self, name: &str, parameters: Value) -> Result<(), DispatchError> {
        self.views.render(name, parameters)
    }

    pub fn render_to<W: Write + ?Sized>(
        &self,
        name: &str,
        parameters: Value,
        out: &mut W,
    ) -> Result<(), DispatchError> {
        self.views.render_to(name, parameters, out)
    }

    /// Renders view `name` and returns the output.
    pub fn call(&self, name: &str, parameters: Value) -> Result<String, DispatchError> {
        self.views.call(name, parameters)
    }

    pub fn resolve(&self, name: &str) -> Result<ResolvedView, DispatchError> {
        self.views.resolve(name)
    }

    /// Reads a plugin option, falling back to `default`.
    pub fn get_option(&self, option: &str, default: Value) -> Value {
        self.options.get(&self.host, option, default)
    }

    pub fn set_option(&mut self, option: &str, value: Value) {
        self.options.set(&mut self.host, option, value);
    }
}

impl<H: Host> std::fmt::Debug for Plugin<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("config", &self.config)
            .field("views", &self.views)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Plugin`].
pub struct PluginBuilder {
    config: PluginConfig,
    dispatcher: Option<wpbootstrap_dispatch::ViewDispatcherBuilder>,
    engine: Option<Box<dyn TemplateEngine>>,
    upgrade: Option<UpgradeFn>,
    activate: Option<Callback>,
    deactivate: Option<Callback>,
}

impl PluginBuilder {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            config,
            dispatcher: None,
            engine: None,
            upgrade: None,
            activate: None,
            deactivate: None,
        }
    }

    fn dispatcher(&mut self) -> wpbootstrap_dispatch::ViewDispatcherBuilder {
        self.dispatcher.take().unwrap_or_else(|| {
            ViewDispatcher::builder(self.config.name.clone(), self.config.view_root())
        })
    }

    /// Registers the action run before `view` renders.
    pub fn action<F>(mut self, view: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let builder = self.dispatcher().action(view, f);
        self.dispatcher = Some(builder);
        self
    }

    /// Template engine; defaults to MiniJinja.
    pub fn engine(mut self, engine: Box<dyn TemplateEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Routine run when the recorded version differs from the configured one.
    pub fn on_upgrade<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<(), BoxError> + 'static,
    {
        self.upgrade = Some(Box::new(f));
        self
    }

    /// Callback for the activation hook; defaults to the `activate` method.
    pub fn on_activate(mut self, callback: Callback) -> Self {
        self.activate = Some(callback);
        self
    }

    /// Callback for the deactivation hook; defaults to the `deactivate` method.
    pub fn on_deactivate(mut self, callback: Callback) -> Self {
        self.deactivate = Some(callback);
        self
    }

    /// Binds the plugin to `host`: registers lifecycle hooks and runs any
    /// pending upgrade.
    pub fn build<H: Host>(mut self, mut host: H) -> Result<Plugin<H>, PluginError> {
        self.config.validate()?;

        let mut dispatcher = self.dispatcher().extension(self.config.extension.clone());
        let theme_root = self.config.theme_root.clone().or_else(|| host.theme_root());
        if let Some(theme_root) = theme_root {
            dispatcher = dispatcher.override_root(
                theme_root
                    .join(crate::THEME_VIEW_DIRECTORY)
                    .join(&self.config.name),
            );
        }
        if let Some(engine) = self.engine.take() {
            dispatcher = dispatcher.engine(engine);
        }

        let lifecycle_tag = format!(
            "{}/{}",
            base_directory_name(&self.config.base_dir),
            self.config.name
        );
        {
            let mut hooks = Hooks::new(&mut host);
            hooks.action(
                &format!("activate_{}", lifecycle_tag),
                Some(self.activate.take().unwrap_or_else(|| "activate".into())),
            )?;
            hooks.action(
                &format!("deactivate_{}", lifecycle_tag),
                Some(self.deactivate.take().unwrap_or_else(|| "deactivate".into())),
            )?;
        }

        let options = OptionNamespace::new(Scope::Plugin, &self.config.name);
        reconcile_version(
            &options,
            &mut host,
            &self.config.name,
            &self.config.version,
            self.upgrade.as_ref(),
        )?;

        Ok(Plugin {
            config: self.config,
            host,
            views: dispatcher.build(),
            options,
        })
    }
}

/// Runs the upgrade routine when the recorded version differs from
/// `version`, then records `version`.
pub(crate) fn reconcile_version<H: Host + ?Sized>(
    options: &OptionNamespace,
    host: &mut H,
    name: &str,
    version: &str,
    upgrade: Option<&UpgradeFn>,
) -> Result<(), PluginError> {
    let recorded = options.recorded_version(&*host);
    if recorded == version {
        return Ok(());
    }

    tracing::info!(name, from = %recorded, to = version, "upgrading");
    if let Some(upgrade) = upgrade {
        upgrade(&recorded, version).map_err(|source| PluginError::Upgrade {
            name: name.to_string(),
            from: recorded.clone(),
            to: version.to_string(),
            source,
        })?;
    }
    options.set(host, VERSION_OPTION, Value::from(version));
    Ok(())
}

fn base_directory_name(base_dir: &Path) -> String {
    let resolved = if base_dir.file_name().is_some() {
        base_dir.to_path_buf()
    } else {
        std::fs::canonicalize(base_dir).unwrap_or_else(|_| base_dir.to_path_buf())
    };
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
