//! End-to-end dispatch behaviour against real view trees.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;
use wpbootstrap_dispatch::{DispatchError, ViewDispatcher};
use wpbootstrap_render::RenderError;

fn write_view(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

struct Site {
    plugin: TempDir,
    theme: TempDir,
}

impl Site {
    fn new() -> Self {
        Self {
            plugin: TempDir::new().unwrap(),
            theme: TempDir::new().unwrap(),
        }
    }

    fn view_root(&self) -> std::path::PathBuf {
        self.plugin.path().join("view")
    }

    fn override_root(&self) -> std::path::PathBuf {
        self.theme.path().join("view").join("acme")
    }

    fn dispatcher(&self) -> ViewDispatcher {
        ViewDispatcher::builder("acme", self.view_root())
            .override_root(self.override_root())
            .build()
    }
}

#[test]
fn nested_view_renders_from_subdirectory() {
    let site = Site::new();
    write_view(&site.view_root(), "admin/options.jinja", "Options: {{ title }}");

    let output = site
        .dispatcher()
        .call("Admin_Options", json!({"title": "General"}))
        .unwrap();
    assert_eq!(output, "Options: General");
}

#[test]
fn hyphenated_view_renders() {
    let site = Site::new();
    write_view(&site.view_root(), "admin-options.jinja", "flat");

    let output = site.dispatcher().call("AdminOptions", Value::Null).unwrap();
    assert_eq!(output, "flat");
}

#[test]
fn theme_override_wins_over_plugin_view() {
    let site = Site::new();
    write_view(&site.view_root(), "my-view.jinja", "plugin {{ who }}");
    write_view(&site.override_root(), "my-view.jinja", "theme {{ who }}");

    let views = site.dispatcher();
    let resolved = views.resolve("MyView").unwrap();
    assert!(resolved.is_override);

    let output = views.call("MyView", json!({"who": "copy"})).unwrap();
    assert_eq!(output, "theme copy");
}

#[test]
fn missing_view_fails_and_emits_nothing() {
    let site = Site::new();
    let mut out = Vec::new();

    let err = site
        .dispatcher()
        .handle("renderMissing", json!({"x": 1}), &mut out)
        .unwrap_err();

    match err {
        DispatchError::ViewNotFound(path) => {
            assert_eq!(path, site.view_root().join("missing.jinja"));
        }
        other => panic!("expected ViewNotFound, got {other:?}"),
    }
    assert!(out.is_empty());
}

#[test]
fn unknown_verb_never_touches_filesystem() {
    // The view root does not exist at all; a filesystem probe would surface
    // as ViewNotFound instead.
    let views = ViewDispatcher::builder("acme", "/definitely/not/here").build();
    let mut out = Vec::new();

    for method in ["fooBar", "displayMyView", "Render", "rendre"] {
        let err = views.handle(method, Value::Null, &mut out).unwrap_err();
        assert!(
            matches!(err, DispatchError::UnsupportedOperation { .. }),
            "{method} should be unsupported, got {err:?}"
        );
    }
    assert!(out.is_empty());
}

#[test]
fn call_returns_what_render_emits() {
    let site = Site::new();
    write_view(
        &site.view_root(),
        "report/summary.jinja",
        "{% for item in items %}- {{ item }}\n{% endfor %}total={{ items | length }}",
    );
    let views = site.dispatcher();
    let params = json!({"items": ["a", "b", "c"]});

    let mut emitted = Vec::new();
    let rendered = views
        .handle("renderReport_Summary", params.clone(), &mut emitted)
        .unwrap();
    assert!(rendered.is_none());

    let mut untouched = Vec::new();
    let called = views
        .handle("callReport_Summary", params, &mut untouched)
        .unwrap();

    assert_eq!(called.unwrap(), String::from_utf8(emitted).unwrap());
    assert!(untouched.is_empty());
}

#[test]
fn action_result_replaces_caller_parameters() {
    let site = Site::new();
    write_view(
        &site.view_root(),
        "admin/options.jinja",
        "[{{ secret }}][{{ title }}][{{ saved }}]",
    );

    let views = ViewDispatcher::builder("acme", site.view_root())
        .action("Admin_Options", |params| {
            Ok(json!({
                "title": params["title"].as_str().unwrap_or("").to_uppercase(),
                "saved": true,
            }))
        })
        .build();

    let output = views
        .call("Admin_Options", json!({"title": "general", "secret": "s3cr3t"}))
        .unwrap();
    assert_eq!(output, "[][GENERAL][true]");
}

#[test]
fn action_returning_scalar_gives_empty_scope() {
    let site = Site::new();
    write_view(&site.view_root(), "my-view.jinja", "<{{ title }}>");

    let views = ViewDispatcher::builder("acme", site.view_root())
        .action("MyView", |_| Ok(json!(42)))
        .build();

    assert_eq!(views.call("MyView", json!({"title": "x"})).unwrap(), "<>");
}

#[test]
fn parameters_pass_through_without_action() {
    let site = Site::new();
    write_view(&site.view_root(), "my-view.jinja", "{{ message }}/{{ resultCount }}");

    let output = site
        .dispatcher()
        .call(
            "MyView",
            json!({"message": "Some message here", "resultCount": 100}),
        )
        .unwrap();
    assert_eq!(output, "Some message here/100");
}

#[derive(Debug, PartialEq)]
struct Rejected(&'static str);

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rejected: {}", self.0)
    }
}

impl std::error::Error for Rejected {}

#[test]
fn action_error_keeps_its_identity() {
    let site = Site::new();
    write_view(&site.view_root(), "my-view.jinja", "never rendered");

    let views = ViewDispatcher::builder("acme", site.view_root())
        .action("MyView", |_| Err(Rejected("nonce").into()))
        .build();

    let mut out = Vec::new();
    let err = views
        .handle("renderMyView", Value::Null, &mut out)
        .unwrap_err();

    let original = err
        .action_source()
        .and_then(|e| e.downcast_ref::<Rejected>())
        .expect("original error should be preserved");
    assert_eq!(original, &Rejected("nonce"));
    assert!(out.is_empty());
}

#[test]
fn template_cannot_leak_into_next_call() {
    let site = Site::new();
    write_view(
        &site.view_root(),
        "my-view.jinja",
        "{% set leaked = 'yes' %}{{ leaked }}",
    );
    write_view(&site.view_root(), "other.jinja", "[{{ leaked }}]");

    let views = site.dispatcher();
    assert_eq!(views.call("MyView", Value::Null).unwrap(), "yes");
    assert_eq!(views.call("Other", Value::Null).unwrap(), "[]");
}

#[test]
fn malformed_names_never_reach_the_filesystem() {
    let site = Site::new();
    write_view(&site.view_root(), "admin-options.jinja", "flat");
    write_view(&site.view_root(), "admin/options.jinja", "nested");
    write_view(&site.view_root(), ".jinja", "empty");
    write_view(site.plugin.path(), "secret.jinja", "SECRET");

    let views = site.dispatcher();
    let mut out = Vec::new();
    for method in [
        "callAdmin-options",
        "callAdmin/options",
        "callAdmin/../secret",
        "callAdmin/../../../secret",
        "call",
        "render",
    ] {
        let err = views.handle(method, Value::Null, &mut out).unwrap_err();
        assert!(
            matches!(err, DispatchError::UnsupportedOperation { .. }),
            "{method} should be rejected, got {err:?}"
        );
    }
    assert!(out.is_empty());

    for name in ["Admin-options", "Admin/../secret", ""] {
        let err = views.call(name, Value::Null).unwrap_err();
        assert!(
            matches!(err, DispatchError::InvalidViewName(_)),
            "{name:?} should be rejected, got {err:?}"
        );
    }
}

#[test]
fn missing_partial_is_a_render_error_not_a_missing_view() {
    let site = Site::new();
    write_view(&site.view_root(), "my-view.jinja", "{% include 'partial.jinja' %}");

    let err = site.dispatcher().call("MyView", Value::Null).unwrap_err();
    match err {
        DispatchError::Render(RenderError::TemplateError(msg)) => {
            assert!(msg.contains("partial.jinja"), "{msg}");
        }
        other => panic!("expected a template error, got {other:?}"),
    }
}
