//! Error type for view dispatch.

use std::path::PathBuf;

use thiserror::Error;
use wpbootstrap_render::RenderError;

/// Boxed error returned by actions and hook callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while dispatching a `render<Name>` / `call<Name>` request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The method name starts with neither `render` nor `call`.
    ///
    /// This is a programming error in the caller, raised before any
    /// filesystem access.
    #[error("invalid method {method} called on plugin {plugin}")]
    UnsupportedOperation { method: String, plugin: String },

    /// The view file is absent under the plugin's own view root.
    #[error("view file does not exist: \"{}\"", .0.display())]
    ViewNotFound(PathBuf),

    /// The view name cannot address a file under the view root.
    #[error("invalid view name {0:?}")]
    InvalidViewName(String),

    /// The action registered for the view failed. The source is the action's
    /// own error value, untouched.
    #[error("action for view {view} failed")]
    Action {
        view: String,
        #[source]
        source: BoxError,
    },

    /// The template failed to render.
    #[error(transparent)]
    Render(RenderError),

    /// Writing rendered output to the destination failed.
    #[error("failed to emit rendered view: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatchError {
    /// Returns the original error raised by an action, if this is an action failure.
    pub fn action_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            DispatchError::Action { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<RenderError> for DispatchError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::ViewNotFound(path) => DispatchError::ViewNotFound(path),
            RenderError::InvalidViewName(name) => DispatchError::InvalidViewName(name),
            other => DispatchError::Render(other),
        }
    }
}
