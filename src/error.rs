//! Error taxonomy for lesson, progress and store operations
//!
//! A failed validation is not an error: it is a normal `success: false`
//! result. These variants cover lookups, gating, bad input and the store.

/// Errors surfaced by sessions and the HTTP API
#[derive(Debug, thiserror::Error)]
pub enum AcademyError {
    #[error("lesson {0} not found")]
    LessonNotFound(u32),

    #[error("step {step} not found in lesson {lesson}")]
    StepNotFound { lesson: u32, step: u32 },

    #[error("document {0} not found")]
    DocumentNotFound(String),

    #[error("lesson {0} is locked until its prerequisites are completed")]
    Locked(u32),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl AcademyError {
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedRequest(message.to_string())
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::LessonNotFound(_) | Self::StepNotFound { .. } | Self::DocumentNotFound(_) => 404,
            Self::Locked(_) => 403,
            Self::MalformedRequest(_) => 400,
            Self::Store(_) => 500,
        }
    }

    /// Stable machine-readable code for the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            Self::LessonNotFound(_) | Self::StepNotFound { .. } | Self::DocumentNotFound(_) => {
                "not_found"
            }
            Self::Locked(_) => "locked",
            Self::MalformedRequest(_) => "bad_request",
            Self::Store(_) => "store_error",
        }
    }
}

pub type AcademyResult<T> = std::result::Result<T, AcademyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AcademyError::LessonNotFound(9).status_code(), 404);
        assert_eq!(AcademyError::StepNotFound { lesson: 1, step: 9 }.code(), "not_found");
        assert_eq!(AcademyError::Locked(6).status_code(), 403);
        assert_eq!(AcademyError::malformed("bad json").status_code(), 400);
        assert_eq!(AcademyError::from(anyhow::anyhow!("disk full")).status_code(), 500);
    }

    #[test]
    fn test_store_error_message_includes_context() {
        let err = anyhow::anyhow!("no such table").context("Failed to read users/u1");
        let msg = AcademyError::from(err).to_string();
        assert!(msg.contains("Failed to read users/u1"));
        assert!(msg.contains("no such table"));
    }
}
