use thiserror::Error;

/// Why a source could not be turned into a runnable document.
///
/// The `Display` text is what the build-error page shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{message}")]
    Parse { message: String },

    #[error("{message}")]
    Lowering { message: String },

    #[error("Invalid preview options: {reason}")]
    InvalidOptions { reason: String },
}

impl BuildError {
    /// Build from a diagnostic list, keeping the first and counting the rest.
    pub fn parse<D: std::fmt::Display>(diagnostics: &[D]) -> Self {
        BuildError::Parse {
            message: summarize(diagnostics),
        }
    }

    pub fn lowering<D: std::fmt::Display>(diagnostics: &[D]) -> Self {
        BuildError::Lowering {
            message: summarize(diagnostics),
        }
    }

    pub fn invalid_options(reason: impl Into<String>) -> Self {
        BuildError::InvalidOptions {
            reason: reason.into(),
        }
    }
}

fn summarize<D: std::fmt::Display>(diagnostics: &[D]) -> String {
    match diagnostics {
        [] => "Unknown error".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_counts_extra_diagnostics() {
        let err = BuildError::parse(&["Unexpected token", "Expected `}`"][..]);
        assert_eq!(err.to_string(), "Unexpected token (and 1 more)");

        let err = BuildError::lowering(&["Namespace tags are not supported"][..]);
        assert_eq!(err.to_string(), "Namespace tags are not supported");
    }
}
