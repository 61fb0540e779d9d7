//! Hook registration helpers.
//!
//! A CMS exposes three kinds of extension points: actions, filters and
//! shortcodes. AJAX endpoints are actions on a `wp_ajax_<name>` tag. The host
//! owns the actual registry; this module only builds registrations and hands
//! them to a [`HookHost`].
//!
//! # Default Callbacks
//!
//! When no callback is given, the callback is a method on the owning plugin
//! named after the hook kind and tag:
//!
//! | Call | Tag | Default method |
//! |------|-----|----------------|
//! | `action("init", None)` | `init` | `actionInit` |
//! | `filter("the_title", None)` | `the_title` | `filterThe_title` |
//! | `shortcode("gallery", None)` | `gallery` | `shortcodeGallery` |
//! | `ajax("save", None)` | `wp_ajax_save` | `ajaxSave` |
//!
//! Method callbacks are resolved by the host against the plugin object.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use wpbootstrap_render::ucfirst;

use crate::error::BoxError;

/// Host default for hook priority.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Host default for the number of arguments a callback accepts.
pub const DEFAULT_ACCEPTED_ARGS: u32 = 1;

/// Tag prefix the host uses for authenticated AJAX actions.
pub const AJAX_TAG_PREFIX: &str = "wp_ajax_";

/// Kind of extension point a callback is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Action,
    Filter,
    Shortcode,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Action => write!(f, "action"),
            HookKind::Filter => write!(f, "filter"),
            HookKind::Shortcode => write!(f, "shortcode"),
        }
    }
}

/// Type alias for callback functions handed straight to the host.
///
/// Arguments arrive in host order; the return value is ignored for actions.
pub type HookFn = Rc<dyn Fn(&[Value]) -> Result<Value, BoxError>>;

/// What the host should call when a hook fires.
#[derive(Clone)]
pub enum Callback {
    /// A method on the owning plugin, looked up by name.
    Method(String),
    /// A free-standing function.
    Function(HookFn),
}

impl Callback {
    /// Wraps a closure as a function callback.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, BoxError> + 'static,
    {
        Callback::Function(Rc::new(f))
    }

    /// Returns the method name for method callbacks.
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Callback::Method(name) => Some(name),
            Callback::Function(_) => None,
        }
    }

    /// Invokes a function callback. Method callbacks need the host and
    /// return `None`.
    pub fn invoke(&self, args: &[Value]) -> Option<Result<Value, BoxError>> {
        match self {
            Callback::Function(f) => Some(f(args)),
            Callback::Method(_) => None,
        }
    }
}

impl From<&str> for Callback {
    fn from(method: &str) -> Self {
        Callback::Method(method.to_string())
    }
}

impl From<String> for Callback {
    fn from(method: String) -> Self {
        Callback::Method(method)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Callback::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Resolves the callback for a hook: explicit callbacks pass through,
/// otherwise the method `<prefix><Tag>` is used.
pub fn parse_callback(prefix: &str, tag: &str, method: Option<Callback>) -> Callback {
    method.unwrap_or_else(|| Callback::Method(format!("{}{}", prefix, ucfirst(tag))))
}

/// One hook registration, as handed to the host.
#[derive(Debug, Clone)]
pub struct HookRegistration {
    pub kind: HookKind,
    pub tag: String,
    pub callback: Callback,
    /// Ignored by hosts for shortcodes.
    pub priority: i32,
    /// Ignored by hosts for shortcodes.
    pub accepted_args: u32,
}

/// Error returned by a host when it refuses a registration.
#[derive(Debug, Error)]
#[error("cannot register {kind} hook {tag}: {message}")]
pub struct HookError {
    pub kind: HookKind,
    pub tag: String,
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl HookError {
    pub fn new(kind: HookKind, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.source = Some(source.into());
        self
    }
}

/// The host's hook registry.
pub trait HookHost {
    fn add_hook(&mut self, registration: HookRegistration) -> Result<(), HookError>;
}

/// Registers hooks on a host with the host's defaults filled in.
///
/// # Example
///
/// ```rust,ignore
/// let mut hooks = Hooks::new(&mut host);
/// hooks.action("init", None)?;                           // → actionInit
/// hooks.filter_at("the_content", Some("wrap".into()), 20, 1)?;
/// hooks.ajax("save_settings", None)?;                    // wp_ajax_save_settings → ajaxSave_settings
/// ```
pub struct Hooks<'h, H: HookHost + ?Sized> {
    host: &'h mut H,
}

impl<'h, H: HookHost + ?Sized> Hooks<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self { host }
    }

    /// Hands a fully specified registration to the host.
    pub fn register(&mut self, registration: HookRegistration) -> Result<(), HookError> {
        tracing::trace!(
            kind = %registration.kind,
            tag = %registration.tag,
            callback = ?registration.callback,
            priority = registration.priority,
            "registering hook"
        );
        self.host.add_hook(registration)
    }

    /// Registers an action with default priority and arity.
    pub fn action(&mut self, tag: &str, method: Option<Callback>) -> Result<(), HookError> {
        self.action_at(tag, method, DEFAULT_PRIORITY, DEFAULT_ACCEPTED_ARGS)
    }

    pub fn action_at(
        &mut self,
        tag: &str,
        method: Option<Callback>,
        priority: i32,
        accepted_args: u32,
    ) -> Result<(), HookError> {
        self.register(HookRegistration {
            kind: HookKind::Action,
            tag: tag.to_string(),
            callback: parse_callback("action", tag, method),
            priority,
            accepted_args,
        })
    }

    /// Registers a filter with default priority and arity.
    pub fn filter(&mut self, tag: &str, method: Option<Callback>) -> Result<(), HookError> {
        self.filter_at(tag, method, DEFAULT_PRIORITY, DEFAULT_ACCEPTED_ARGS)
    }

    pub fn filter_at(
        &mut self,
        tag: &str,
        method: Option<Callback>,
        priority: i32,
        accepted_args: u32,
    ) -> Result<(), HookError> {
        self.register(HookRegistration {
            kind: HookKind::Filter,
            tag: tag.to_string(),
            callback: parse_callback("filter", tag, method),
            priority,
            accepted_args,
        })
    }

    pub fn shortcode(&mut self, tag: &str, method: Option<Callback>) -> Result<(), HookError> {
        self.register(HookRegistration {
            kind: HookKind::Shortcode,
            tag: tag.to_string(),
            callback: parse_callback("shortcode", tag, method),
            priority: DEFAULT_PRIORITY,
            accepted_args: DEFAULT_ACCEPTED_ARGS,
        })
    }

    /// Registers an AJAX endpoint as an action on `wp_ajax_<action>`.
    pub fn ajax(&mut self, action: &str, method: Option<Callback>) -> Result<(), HookError> {
        self.ajax_at(action, method, DEFAULT_PRIORITY)
    }

    pub fn ajax_at(
        &mut self,
        action: &str,
        method: Option<Callback>,
        priority: i32,
    ) -> Result<(), HookError> {
        self.register(HookRegistration {
            kind: HookKind::Action,
            tag: format!("{}{}", AJAX_TAG_PREFIX, action),
            callback: parse_callback("ajax", action, method),
            priority,
            accepted_args: DEFAULT_ACCEPTED_ARGS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<HookRegistration>,
    }

    impl HookHost for Recorder {
        fn add_hook(&mut self, registration: HookRegistration) -> Result<(), HookError> {
            self.seen.push(registration);
            Ok(())
        }
    }

    struct Refusing;

    impl HookHost for Refusing {
        fn add_hook(&mut self, registration: HookRegistration) -> Result<(), HookError> {
            Err(HookError::new(
                registration.kind,
                registration.tag,
                "host is shutting down",
            ))
        }
    }

    #[test]
    fn test_parse_callback_default_method() {
        let cb = parse_callback("action", "init", None);
        assert_eq!(cb.method_name(), Some("actionInit"));
    }

    #[test]
    fn test_parse_callback_explicit_method() {
        let cb = parse_callback("action", "init", Some("boot".into()));
        assert_eq!(cb.method_name(), Some("boot"));
    }

    #[test]
    fn test_parse_callback_function_passes_through() {
        let cb = parse_callback(
            "filter",
            "the_title",
            Some(Callback::function(|args| Ok(args[0].clone()))),
        );
        assert!(cb.method_name().is_none());
        let out = cb.invoke(&[json!("Title")]).unwrap().unwrap();
        assert_eq!(out, json!("Title"));
    }

    #[test]
    fn test_action_and_filter_defaults() {
        let mut host = Recorder::default();
        {
            let mut hooks = Hooks::new(&mut host);
            hooks.action("init", None).unwrap();
            hooks
                .filter_at("the_content", Some("wrap".into()), 20, 2)
                .unwrap();
        }

        let action = &host.seen[0];
        assert_eq!(action.kind, HookKind::Action);
        assert_eq!(action.tag, "init");
        assert_eq!(action.callback.method_name(), Some("actionInit"));
        assert_eq!(action.priority, DEFAULT_PRIORITY);
        assert_eq!(action.accepted_args, DEFAULT_ACCEPTED_ARGS);

        let filter = &host.seen[1];
        assert_eq!(filter.kind, HookKind::Filter);
        assert_eq!(filter.callback.method_name(), Some("wrap"));
        assert_eq!(filter.priority, 20);
        assert_eq!(filter.accepted_args, 2);
    }

    #[test]
    fn test_shortcode_and_ajax() {
        let mut host = Recorder::default();
        {
            let mut hooks = Hooks::new(&mut host);
            hooks.shortcode("gallery", None).unwrap();
            hooks.ajax("save", None).unwrap();
        }

        assert_eq!(host.seen[0].kind, HookKind::Shortcode);
        assert_eq!(host.seen[0].callback.method_name(), Some("shortcodeGallery"));

        assert_eq!(host.seen[1].kind, HookKind::Action);
        assert_eq!(host.seen[1].tag, "wp_ajax_save");
        assert_eq!(host.seen[1].callback.method_name(), Some("ajaxSave"));
    }

    #[test]
    fn test_host_error_propagates() {
        let mut host = Refusing;
        let err = Hooks::new(&mut host).action("init", None).unwrap_err();
        assert_eq!(err.tag, "init");
        assert!(err.to_string().contains("host is shutting down"));
    }
}
