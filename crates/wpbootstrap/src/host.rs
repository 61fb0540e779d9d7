//! Host collaborator interfaces.
//!
//! The CMS is consumed through two narrow traits: [`OptionStore`] for
//! persistent key/value options and [`HookHost`] for hook registration.
//! [`Host`] bundles them together with the active theme, site URLs, the
//! current post's time and nested shortcode expansion.
//!
//! [`MemoryHost`] is an in-process implementation used by the `wpb` CLI and
//! by tests.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde_json::Value;
use wpbootstrap_dispatch::{HookError, HookHost, HookKind, HookRegistration};

/// Persistent option storage provided by the host.
pub trait OptionStore {
    /// Returns the stored value for `key`, or `None` when unset.
    fn get_option(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_option(&mut self, key: &str, value: Value);
}

/// Expands shortcodes nested in a shortcode's content.
pub type ShortcodeExpander = Rc<dyn Fn(&str) -> String>;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Everything a plugin or theme needs from the CMS.
pub trait Host: OptionStore + HookHost {
    /// Directory of the active theme, if one is active.
    fn theme_root(&self) -> Option<PathBuf> {
        None
    }

    /// Site base URL without a trailing slash; empty for root-relative URLs.
    fn site_url(&self) -> String {
        String::new()
    }

    /// URL of an admin page.
    fn admin_url(&self, path: &str) -> String {
        format!("{}/wp-admin/{}", self.site_url(), path.trim_start_matches('/'))
    }

    /// Public URL of `path` inside the plugin directory `plugin_dir`.
    fn plugins_url(&self, path: &str, plugin_dir: &str) -> String {
        let base = format!("{}/wp-content/plugins/{}", self.site_url(), plugin_dir);
        match path.trim_start_matches('/') {
            "" => base,
            path => format!("{}/{}", base, path),
        }
    }

    /// Unix time of the post being rendered, if any.
    fn post_timestamp(&self) -> Option<i64> {
        None
    }

    /// Human readable distance between two Unix times.
    fn human_time_diff(&self, from: i64, to: i64) -> String {
        human_time_diff(from, to)
    }

    /// Expander for shortcodes nested in shortcode content. `None` leaves
    /// content as written.
    fn shortcode_expander(&self) -> Option<ShortcodeExpander> {
        None
    }
}

/// Distance between two Unix times in the largest whole unit: `5 mins`,
/// `1 hour`, `3 weeks`. Order does not matter and the result is never below 1.
pub fn human_time_diff(from: i64, to: i64) -> String {
    let diff = from.abs_diff(to).min(i64::MAX as u64) as i64;
    let (unit, name) = match diff {
        d if d < HOUR => (MINUTE, "min"),
        d if d < DAY => (HOUR, "hour"),
        d if d < WEEK => (DAY, "day"),
        d if d < MONTH => (WEEK, "week"),
        d if d < YEAR => (MONTH, "month"),
        _ => (YEAR, "year"),
    };
    let count = ((diff + unit / 2) / unit).max(1);
    let plural = if count == 1 { "" } else { "s" };
    format!("{} {}{}", count, name, plural)
}

/// In-memory host: options in a map, hook registrations recorded in order.
#[derive(Default)]
pub struct MemoryHost {
    options: BTreeMap<String, Value>,
    hooks: Vec<HookRegistration>,
    theme_root: Option<PathBuf>,
    site_url: String,
    post_timestamp: Option<i64>,
    shortcode_expander: Option<ShortcodeExpander>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active theme directory.
    pub fn with_theme_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.theme_root = Some(root.into());
        self
    }

    /// Sets the site base URL; a trailing slash is dropped.
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the time of the post being rendered.
    pub fn with_post_timestamp(mut self, timestamp: i64) -> Self {
        self.post_timestamp = Some(timestamp);
        self
    }

    /// Installs the expander used for nested shortcodes.
    pub fn with_shortcode_expander<F>(mut self, expander: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        self.shortcode_expander = Some(Rc::new(expander));
        self
    }

    /// Seeds an option before any plugin reads it.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// All registrations, in the order they were made.
    pub fn registrations(&self) -> &[HookRegistration] {
        &self.hooks
    }

    /// Finds the first registration of `kind` on `tag`.
    pub fn find_hook(&self, kind: HookKind, tag: &str) -> Option<&HookRegistration> {
        self.hooks.iter().find(|h| h.kind == kind && h.tag == tag)
    }

    /// All stored options, sorted by key.
    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    pub fn theme_dir(&self) -> Option<&Path> {
        self.theme_root.as_deref()
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .field("theme_root", &self.theme_root)
            .field("site_url", &self.site_url)
            .field("post_timestamp", &self.post_timestamp)
            .finish_non_exhaustive()
    }
}

impl OptionStore for MemoryHost {
    fn get_option(&self, key: &str) -> Option<Value> {
        self.options.get(key).cloned()
    }

    fn set_option(&mut self, key: &str, value: Value) {
        self.options.insert(key.to_string(), value);
    }
}

impl HookHost for MemoryHost {
    fn add_hook(&mut self, registration: HookRegistration) -> Result<(), HookError> {
        self.hooks.push(registration);
        Ok(())
    }
}

impl Host for MemoryHost {
    fn theme_root(&self) -> Option<PathBuf> {
        self.theme_root.clone()
    }

    fn site_url(&self) -> String {
        self.site_url.clone()
    }

    fn post_timestamp(&self) -> Option<i64> {
        self.post_timestamp
    }

    fn shortcode_expander(&self) -> Option<ShortcodeExpander> {
        self.shortcode_expander.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wpbootstrap_dispatch::Hooks;

    #[test]
    fn test_options_round_trip() {
        let mut host = MemoryHost::new();
        assert_eq!(host.get_option("plugin-acme-version"), None);

        host.set_option("plugin-acme-version", json!("1.2.0"));
        assert_eq!(host.get_option("plugin-acme-version"), Some(json!("1.2.0")));
    }

    #[test]
    fn test_records_hooks_in_order() {
        let mut host = MemoryHost::new();
        {
            let mut hooks = Hooks::new(&mut host);
            hooks.action("init", None).unwrap();
            hooks.filter("body_class", None).unwrap();
        }

        assert_eq!(host.registrations().len(), 2);
        let filter = host.find_hook(HookKind::Filter, "body_class").unwrap();
        assert_eq!(filter.callback.method_name(), Some("filterBody_class"));
        assert!(host.find_hook(HookKind::Action, "body_class").is_none());
    }

    #[test]
    fn test_urls() {
        let host = MemoryHost::new().with_site_url("https://example.test/");
        assert_eq!(host.admin_url("acme"), "https://example.test/wp-admin/acme");
        assert_eq!(
            host.plugins_url("img/logo.png", "acme-gallery"),
            "https://example.test/wp-content/plugins/acme-gallery/img/logo.png"
        );
        assert_eq!(
            host.plugins_url("", "acme-gallery"),
            "https://example.test/wp-content/plugins/acme-gallery"
        );
        assert_eq!(MemoryHost::new().admin_url("/acme"), "/wp-admin/acme");
    }

    #[test]
    fn test_human_time_diff_units() {
        assert_eq!(human_time_diff(0, 0), "1 min");
        assert_eq!(human_time_diff(0, 5 * MINUTE), "5 mins");
        assert_eq!(human_time_diff(5 * MINUTE, 0), "5 mins");
        assert_eq!(human_time_diff(0, 90 * MINUTE), "2 hours");
        assert_eq!(human_time_diff(0, DAY), "1 day");
        assert_eq!(human_time_diff(0, 3 * WEEK), "3 weeks");
        assert_eq!(human_time_diff(0, 2 * MONTH), "2 months");
        assert_eq!(human_time_diff(0, 2 * YEAR), "2 years");
    }

    #[test]
    fn test_theme_root_default_none() {
        assert!(MemoryHost::new().theme_root().is_none());
        let host = MemoryHost::new().with_theme_root("/srv/themes/site");
        assert_eq!(host.theme_root(), Some(PathBuf::from("/srv/themes/site")));
    }
}
