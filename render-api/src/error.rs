//! Error taxonomy shared by the renderer, the bridge and hosts.

use thiserror::Error;

/// Everything that can go wrong between asset intake and frame presentation.
///
/// Asset-level failures (`ResourceUnavailable`, `Parse`) are recoverable: the
/// affected object is dropped from the scene and rendering continues.
/// Pipeline and target failures are fatal at initialization time.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Named asset missing or unreadable
    #[error("asset `{name}` unavailable: {reason}")]
    ResourceUnavailable { name: String, reason: String },

    /// Malformed record or index in a model file
    #[error("model parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Shader module failed wgpu validation
    #[error("shader compilation failed for `{pass}`: {message}")]
    ShaderCompile { pass: String, message: String },

    /// Render pipeline creation failed wgpu validation
    #[error("program link failed for `{pass}`: {message}")]
    ShaderLink { pass: String, message: String },

    /// Shadow render target could not be allocated in a usable state
    #[error("shadow framebuffer incomplete: {reason}")]
    FramebufferIncomplete { reason: String },

    /// No graphics adapter/device satisfying the demo's requirements
    #[error("no suitable graphics adapter")]
    AdapterUnavailable,

    /// Surface acquisition or presentation failure
    #[error("surface error: {0}")]
    Surface(String),
}

impl RenderError {
    /// Fatal errors abort surface setup; non-fatal ones degrade the scene by
    /// one object.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RenderError::ResourceUnavailable { .. } | RenderError::Parse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_errors_are_recoverable() {
        let err = RenderError::ResourceUnavailable {
            name: "cube.obj".into(),
            reason: "not found".into(),
        };
        assert!(!err.is_fatal());
        let err = RenderError::Parse {
            line: 12,
            reason: "bad index".into(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn pipeline_errors_are_fatal() {
        assert!(RenderError::FramebufferIncomplete {
            reason: "zero size".into()
        }
        .is_fatal());
        assert!(RenderError::ShaderLink {
            pass: "lit".into(),
            message: "x".into()
        }
        .is_fatal());
    }
}
