//! Theme base: options, version upgrades and stock shortcodes for a theme.

use serde_json::{json, Value};
use wpbootstrap_dispatch::{BoxError, Callback, HookError, Hooks};

use crate::config::ThemeConfig;
use crate::host::Host;
use crate::options::{replace_defaults, OptionNamespace, Scope};
use crate::plugin::{reconcile_version, PluginError, UpgradeFn};

/// Viewer that previews PDFs linked through the `[pdf]` shortcode.
pub const PDF_VIEWER_URL: &str = "http://docs.google.com/viewer?url=";

/// A configured theme bound to its host.
pub struct ThemeFunctions<H: Host> {
    config: ThemeConfig,
    host: H,
    options: OptionNamespace,
}

impl<H: Host> ThemeFunctions<H> {
    /// Binds the theme to `host` and records its version.
    pub fn new(config: ThemeConfig, host: H) -> Result<Self, PluginError> {
        Self::with_upgrade(config, host, None)
    }

    /// Like [`new`](Self::new), running `upgrade` when the recorded version
    /// differs from the configured one.
    pub fn with_upgrade(
        config: ThemeConfig,
        mut host: H,
        upgrade: Option<UpgradeFn>,
    ) -> Result<Self, PluginError> {
        let options = OptionNamespace::new(Scope::Theme, &config.name);
        reconcile_version(
            &options,
            &mut host,
            &config.name,
            &config.version,
            upgrade.as_ref(),
        )?;
        Ok(Self {
            config,
            host,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// How long ago (or ahead) `timestamp` is from the current post's time.
    /// `None` outside a post.
    pub fn human_time_diff(&self, timestamp: i64) -> Option<String> {
        let post = self.host.post_timestamp()?;
        Some(self.host.human_time_diff(post, timestamp))
    }

    pub fn hooks(&mut self) -> Hooks<'_, H> {
        Hooks::new(&mut self.host)
    }

    pub fn get_option(&self, option: &str, default: Value) -> Value {
        self.options.get(&self.host, option, default)
    }

    pub fn set_option(&mut self, option: &str, value: Value) {
        self.options.set(&mut self.host, option, value);
    }

    /// Registers the `[pdf href="..."]...[/pdf]` shortcode, which links the
    /// document through an online previewer. Shortcodes inside the content
    /// are expanded by the host's [`shortcode_expander`](Host::shortcode_expander).
    pub fn enable_pdf_shortcode(&mut self) -> Result<(), HookError> {
        let expand = self.host.shortcode_expander();
        self.hooks().shortcode(
            "pdf",
            Some(Callback::function(move |args| {
                pdf_shortcode(args, expand.as_deref())
            })),
        )
    }
}

/// Shortcode body for `[pdf]`: `args[0]` are the attributes, `args[1]` the
/// enclosed content, passed through `expand` when given.
pub fn pdf_shortcode(
    args: &[Value],
    expand: Option<&dyn Fn(&str) -> String>,
) -> Result<Value, BoxError> {
    let attributes = replace_defaults(
        json!({ "href": "" }),
        args.first().cloned().unwrap_or(Value::Null),
    );
    let href = match &attributes["href"] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    let content = match args.get(1) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let content = match expand {
        Some(expand) => expand(&content),
        None => content,
    };
    Ok(Value::String(format!(
        "<a class=\"pdf\" href=\"{}{}\">{}</a>",
        PDF_VIEWER_URL, href, content
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, OptionStore};
    use wpbootstrap_dispatch::HookKind;

    #[test]
    fn test_theme_records_version() {
        let theme = ThemeFunctions::new(ThemeConfig::new("site", "2.0"), MemoryHost::new()).unwrap();
        assert_eq!(theme.get_option("version", Value::Null), json!("2.0"));
        assert_eq!(
            theme.host().get_option("theme-site-version"),
            Some(json!("2.0"))
        );
    }

    #[test]
    fn test_theme_upgrade_runs() {
        let host = MemoryHost::new().with_option("theme-site-version", "1.0");
        let upgrade: UpgradeFn = Box::new(|from: &str, to: &str| -> Result<(), BoxError> {
            assert_eq!((from, to), ("1.0", "2.0"));
            Ok(())
        });
        let theme =
            ThemeFunctions::with_upgrade(ThemeConfig::new("site", "2.0"), host, Some(upgrade))
                .unwrap();
        assert_eq!(theme.version(), "2.0");
    }

    #[test]
    fn test_pdf_shortcode_registration() {
        let mut theme =
            ThemeFunctions::new(ThemeConfig::new("site", "1"), MemoryHost::new()).unwrap();
        theme.enable_pdf_shortcode().unwrap();

        let hook = theme.host().find_hook(HookKind::Shortcode, "pdf").unwrap();
        let out = hook
            .callback
            .invoke(&[json!({"href": "https://x.test/a.pdf"}), json!("Annual report")])
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            json!("<a class=\"pdf\" href=\"http://docs.google.com/viewer?url=https://x.test/a.pdf\">Annual report</a>")
        );
    }

    #[test]
    fn test_pdf_shortcode_expands_nested_content() {
        let host = MemoryHost::new()
            .with_shortcode_expander(|content: &str| content.replace("[year]", "2024"));
        let mut theme = ThemeFunctions::new(ThemeConfig::new("site", "1"), host).unwrap();
        theme.enable_pdf_shortcode().unwrap();

        let hook = theme.host().find_hook(HookKind::Shortcode, "pdf").unwrap();
        let out = hook
            .callback
            .invoke(&[json!({"href": "/r.pdf"}), json!("Report [year]")])
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            json!("<a class=\"pdf\" href=\"http://docs.google.com/viewer?url=/r.pdf\">Report 2024</a>")
        );
    }

    #[test]
    fn test_human_time_diff_from_post_time() {
        let theme = ThemeFunctions::new(
            ThemeConfig::new("site", "1"),
            MemoryHost::new().with_post_timestamp(1_000_000),
        )
        .unwrap();
        assert_eq!(theme.human_time_diff(1_000_000 + 2 * 3600).as_deref(), Some("2 hours"));

        let outside =
            ThemeFunctions::new(ThemeConfig::new("site", "1"), MemoryHost::new()).unwrap();
        assert_eq!(outside.human_time_diff(0), None);
    }

    #[test]
    fn test_pdf_shortcode_defaults() {
        let out = pdf_shortcode(&[], None).unwrap();
        assert_eq!(
            out,
            json!("<a class=\"pdf\" href=\"http://docs.google.com/viewer?url=\"></a>")
        );
    }
}
