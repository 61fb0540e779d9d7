//! View dispatch and hook registration for CMS plugins.
//!
//! `wpbootstrap-dispatch` maps method-like requests such as `renderAdmin_Options`
//! or `callMyView` onto view files, runs an optional per-view action to prepare
//! parameters, and renders the result. It also builds hook registrations
//! (actions, filters, shortcodes, AJAX endpoints) for a host to consume.
//!
//! # Features
//!
//! - **Verb parsing**: `render` emits output, `call` returns it
//! - **Actions**: Explicitly registered per-view parameter pre-processing
//! - **Theme overrides**: A theme copy of a view silently wins
//! - **Hooks**: Default callback naming (`action<Tag>`, `filter<Tag>`, ...)
//!
//! # Usage
//!
//! ```rust,ignore
//! use wpbootstrap_dispatch::ViewDispatcher;
//! use serde_json::json;
//!
//! let views = ViewDispatcher::builder("acme", "/srv/plugins/acme/view").build();
//!
//! // view/admin/options.jinja
//! let html = views.call("Admin_Options", json!({"title": "Settings"}))?;
//!
//! // Method-style dispatch, emitting to stdout
//! views.handle("renderMyView", json!(null), &mut std::io::stdout())?;
//! ```

mod action;
mod dispatcher;
mod error;
pub mod hooks;
mod invocation;

pub use action::{from_fn, Action, Actions};
pub use dispatcher::{ViewDispatcher, ViewDispatcherBuilder};
pub use error::{BoxError, DispatchError};
pub use hooks::{
    parse_callback, Callback, HookError, HookFn, HookHost, HookKind, HookRegistration, Hooks,
};
pub use invocation::{Invocation, Verb};
