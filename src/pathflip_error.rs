// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Failures that abort a solve call.
///
/// Proven infeasibility and an exhausted search budget are not errors; they
/// are reported as `SolveOutcome` values.
#[derive(Debug)]
pub enum PathflipError {
    /// The decision procedure is missing, could not be spawned, or exited
    /// abnormally.
    BackendUnavailable(String),
    /// The decision procedure did not finish within the configured budget.
    SolverTimeout(Duration),
    /// A response line did not match any shape the parser understands.
    ProtocolViolation { line_no: usize, line: String },
    /// The requested branch does not exist in the path constraint.
    BranchOutOfRange { index: usize, len: usize },
    /// The run counter holds the largest representable run index.
    RunCounterExhausted { path: std::path::PathBuf },
    Io {
        context: String,
        source: std::io::Error,
    },
    Json {
        context: String,
        source: serde_json::Error,
    },
}

impl PathflipError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PathflipError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PathflipError::Json {
            context: context.into(),
            source,
        }
    }
}

impl std::fmt::Display for PathflipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathflipError::BackendUnavailable(msg) => {
                write!(f, "decision procedure unavailable: {}", msg)
            }
            PathflipError::SolverTimeout(timeout) => {
                write!(f, "decision procedure timed out after {:?}", timeout)
            }
            PathflipError::ProtocolViolation { line_no, line } => write!(
                f,
                "unexpected line {} in solver response: {:?}",
                line_no, line
            ),
            PathflipError::BranchOutOfRange { index, len } => write!(
                f,
                "branch index {} out of range for path constraint of length {}",
                index, len
            ),
            PathflipError::RunCounterExhausted { path } => write!(
                f,
                "run counter in {} cannot be advanced further",
                path.display()
            ),
            PathflipError::Io { context, source } => write!(f, "{}: {}", context, source),
            PathflipError::Json { context, source } => write!(f, "{}: {}", context, source),
        }
    }
}

impl std::error::Error for PathflipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathflipError::Io { source, .. } => Some(source),
            PathflipError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_line() {
        let e = PathflipError::ProtocolViolation {
            line_no: 3,
            line: "garbage".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "unexpected line 3 in solver response: \"garbage\""
        );
    }

    #[test]
    fn test_io_error_exposes_source() {
        let e = PathflipError::io(
            "reading response",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(std::error::Error::source(&e).is_some());
        assert_eq!(e.to_string(), "reading response: gone");
    }
}
