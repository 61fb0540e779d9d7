//! # wpbootstrap - Convention over Configuration for CMS Plugins
//!
//! `wpbootstrap` lets plugin and theme authors write plain functions instead
//! of hand-registering hooks, and render views whose file path is inferred
//! from the view's name.
//!
//! ## Core Concepts
//!
//! - [`Plugin`]: Views, hooks, namespaced options and upgrades for one plugin
//! - [`ThemeFunctions`]: Options, upgrades and stock shortcodes for a theme
//! - [`Host`]: What the CMS provides (options, hook registry, active theme)
//! - [`ViewDispatcher`]: `render<Name>` / `call<Name>` dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wpbootstrap::{MemoryHost, PluginBuilder, PluginConfig};
//! use serde_json::json;
//!
//! let config = PluginConfig::new("acme", "1.0.0", "/srv/plugins/acme");
//! let plugin = PluginBuilder::new(config)
//!     .action("Admin_Options", |params| Ok(params))
//!     .build(MemoryHost::new())?;
//!
//! // Renders /srv/plugins/acme/view/admin/options.jinja, or the active
//! // theme's view/acme/admin/options.jinja when it exists.
//! let html = plugin.call("Admin_Options", json!({"title": "Settings"}))?;
//!
//! // Method-style dispatch writes straight to the output stream.
//! plugin.handle("renderMyView", json!(null), &mut std::io::stdout())?;
//! ```
//!
//! ## Logging
//!
//! The crates emit [`tracing`] events: `debug` when a theme override shadows a
//! plugin view or an action runs, `info` on upgrades, `trace` for each hook
//! registration. Install a subscriber to see them.

pub mod config;
pub mod host;
pub mod options;
pub mod plugin;
pub mod theme;

/// Theme sub-directory holding plugin view overrides.
pub const THEME_VIEW_DIRECTORY: &str = "view";

pub use config::{ConfigError, PluginConfig, ThemeConfig};
pub use host::{human_time_diff, Host, MemoryHost, OptionStore, ShortcodeExpander};
pub use options::{replace_defaults, OptionNamespace, Scope};
pub use plugin::{Plugin, PluginBuilder, PluginError, UpgradeFn};
pub use theme::{pdf_shortcode, ThemeFunctions};

pub use wpbootstrap_dispatch::{
    Action, BoxError, Callback, DispatchError, HookError, HookHost, HookKind, HookRegistration,
    Hooks, Invocation, Verb, ViewDispatcher,
};
pub use wpbootstrap_render::{
    MiniJinjaEngine, RenderError, RenderScope, ResolvedView, TemplateEngine, View, ViewResolver,
};
