//! View name to file path derivation.
//!
//! View names are UpperCamelCase identifiers where an underscore in front of an
//! uppercase letter opens a sub-directory:
//!
//! | View name | Relative file |
//! |-----------|---------------|
//! | `MyView` | `my-view.jinja` |
//! | `AdminOptions` | `admin-options.jinja` |
//! | `Admin_Options` | `admin/options.jinja` |
//! | `Admin_UserList` | `admin/user-list.jinja` |
//!
//! The derivation always drops the first character of the transformed string,
//! which for a well-formed name is the leading `-` produced by its first
//! uppercase letter. A name that starts with anything else loses that
//! character instead (`myView` becomes `y-view`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Default extension appended to derived view paths.
pub const DEFAULT_EXTENSION: &str = "jinja";

/// Separator used inside derived paths, independent of the host platform.
pub const PATH_SEPARATOR: char = '/';

static SEGMENT_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_[A-Z]|[A-Z]").expect("segment pattern is valid"));

/// Derives the extension-less relative path for a view name.
///
/// # Example
///
/// ```rust
/// use wpbootstrap_render::naming::view_path;
///
/// assert_eq!(view_path("Admin_Options"), "admin/options");
/// assert_eq!(view_path("MyView"), "my-view");
/// ```
pub fn view_path(name: &str) -> String {
    let expanded = SEGMENT_BREAK.replace_all(name, |caps: &Captures<'_>| {
        let matched = &caps[0];
        match matched.strip_prefix('_') {
            Some(letter) => format!("{}{}", PATH_SEPARATOR, letter),
            None => format!("-{}", matched),
        }
    });

    let mut chars = expanded.chars();
    chars.next();
    chars.as_str().to_ascii_lowercase()
}

/// Returns true when every character of `name` is an ASCII letter, digit or
/// underscore, and `name` is not empty.
pub fn is_view_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Like [`view_path`], but `None` for names that cannot address a view file.
///
/// Rejects names failing [`is_view_name`] and derivations with an empty or
/// `..` segment (`_` or `__Admin`), so a view never resolves outside its root
/// and two names never share a file through an elided segment.
///
/// ```rust
/// use wpbootstrap_render::naming::checked_view_path;
///
/// assert_eq!(checked_view_path("Admin_Options").as_deref(), Some("admin/options"));
/// assert_eq!(checked_view_path("Admin/../secret"), None);
/// assert_eq!(checked_view_path(""), None);
/// ```
pub fn checked_view_path(name: &str) -> Option<String> {
    if !is_view_name(name) {
        return None;
    }
    let path = view_path(name);
    if path
        .split(PATH_SEPARATOR)
        .any(|segment| segment.is_empty() || segment == "..")
    {
        return None;
    }
    Some(path)
}

/// Derives the relative view file, including extension, for a view name.
///
/// The extension may be given with or without its leading dot.
pub fn view_file(name: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    format!("{}.{}", view_path(name), extension)
}

/// Uppercases the first character of `s`, leaving the rest untouched.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
