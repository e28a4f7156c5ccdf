// File: src/error.rs
// Purpose: Why a navigation did not happen

use std::fmt;

use crate::middleware::Denial;
use crate::routes::RouteRef;
use crate::validation::ValidationErrors;

/// History direction of a back/forward request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Back => f.write_str("back"),
            Direction::Forward => f.write_str("forward"),
        }
    }
}

/// A navigation that was aborted. Router state is unchanged in every case.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    /// No route is registered under this key
    #[error("unknown route '{route}'")]
    UnknownRoute { route: RouteRef },

    /// One or more parameters failed validation
    #[error("invalid route parameters: {0}")]
    InvalidParams(ValidationErrors),

    /// A guard or middleware declined the transition
    #[error("navigation denied: {0}")]
    Denied(Denial),

    /// Static navigation needs a host and none is attached
    #[error("no host navigator attached")]
    HostUnavailable,

    /// The host failed to perform the transition
    #[error("host navigation failed: {0:#}")]
    Host(anyhow::Error),

    /// A middleware raised an error
    #[error("middleware failed: {0:#}")]
    Middleware(anyhow::Error),

    /// Nothing to go back or forward to
    #[error("cannot go {direction}: at the end of history")]
    HistoryBoundary { direction: Direction },
}

impl NavigationError {
    /// Failures that are reported to the error handlers.
    ///
    /// Denials and validation failures are expected outcomes and are only
    /// logged.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, NavigationError::Host(_) | NavigationError::Middleware(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, NavigationError::Denied(_))
    }
}

impl From<ValidationErrors> for NavigationError {
    fn from(errors: ValidationErrors) -> Self {
        NavigationError::InvalidParams(errors)
    }
}

impl From<Denial> for NavigationError {
    fn from(denial: Denial) -> Self {
        NavigationError::Denied(denial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_raised_errors_are_unhandled() {
        assert!(NavigationError::Middleware(anyhow::anyhow!("boom")).is_unhandled());
        assert!(NavigationError::Host(anyhow::anyhow!("gone")).is_unhandled());
        assert!(!NavigationError::HostUnavailable.is_unhandled());
        assert!(!NavigationError::HistoryBoundary {
            direction: Direction::Back
        }
        .is_unhandled());
    }

    #[test]
    fn test_messages() {
        let err = NavigationError::UnknownRoute {
            route: RouteRef::new("user", "nope"),
        };
        assert_eq!(err.to_string(), "unknown route 'user.nope'");

        let err = NavigationError::HistoryBoundary {
            direction: Direction::Forward,
        };
        assert_eq!(err.to_string(), "cannot go forward: at the end of history");

        let denial = Denial::Middleware {
            middleware: "maintenance".to_string(),
        };
        let err: NavigationError = denial.into();
        assert!(err.is_denied());
        assert_eq!(
            err.to_string(),
            "navigation denied: middleware 'maintenance' declined the navigation"
        );
    }
}
