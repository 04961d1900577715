//! Error types for the interpolate crate.

use thiserror::Error;

/// Boxed error returned by caller-supplied resolvers and string transforms.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when compiling a template.
#[derive(Debug, Error)]
pub enum InterpolateError {
    /// A placeholder path resolved to nothing while strict mode was on.
    ///
    /// `path` is the placeholder text exactly as written in the template,
    /// surrounding whitespace included.
    #[error("Missing variable: {path}")]
    MissingVariable { path: String },

    /// A custom resolver failed. The caller's error is carried as-is.
    #[error("{0}")]
    Resolver(BoxError),

    /// A string transform failed. The caller's error is carried as-is.
    #[error("{0}")]
    Transform(BoxError),

    /// The variable pattern cannot be used as a placeholder matcher.
    #[error("invalid variable pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The variable pattern failed to compile.
    #[error("invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Options could not be loaded from a configuration document.
    #[error("invalid options: {0}")]
    Config(String),
}

impl From<serde_json::Error> for InterpolateError {
    fn from(err: serde_json::Error) -> Self {
        InterpolateError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for InterpolateError {
    fn from(err: serde_yaml::Error) -> Self {
        InterpolateError::Config(err.to_string())
    }
}

/// Result type for interpolate operations.
pub type Result<T> = std::result::Result<T, InterpolateError>;

/// Reasons the safe JSON parser refuses a string.
///
/// These never reach the caller of [`compile_template`](crate::compile_template):
/// coercion falls back to the unparsed string instead.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    /// The document contains a key that could reach an object prototype.
    #[error("forbidden key '{0}' in JSON input")]
    ForbiddenKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_message() {
        let err = InterpolateError::MissingVariable {
            path: "user.name".to_string(),
        };
        assert_eq!(err.to_string(), "Missing variable: user.name");
    }

    #[test]
    fn caller_errors_display_unchanged() {
        let err = InterpolateError::Resolver("backend offline".into());
        assert_eq!(err.to_string(), "backend offline");
    }

    #[test]
    fn from_serde_json_error_is_config() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: InterpolateError = json_err.into();
        assert!(matches!(err, InterpolateError::Config(_)));
    }
}
